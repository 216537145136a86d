use super::Real;
use std::{
    fmt::Display,
    fs::File,
    io::{BufWriter, Error, Write},
    path::Path,
};

pub trait SavablePoint {
    fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), Error>;
}

impl<T, V> SavablePoint for (T, V)
where
    T: Display,
    V: Display,
{
    fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), Error> {
        writeln!(writer, "{0},{1}", self.0, self.1)
    }
}

impl SavablePoint for Real {
    fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), Error> {
        writeln!(writer, "{self}")
    }
}

/// Writes every item of an iterator to a text file, one line per item.
pub trait SaveToFileFilter<I>
where
    I: Iterator,
    I::Item: SavablePoint,
{
    fn save_to_file(self, path: &Path) -> Result<(), Error>;
}

impl<I> SaveToFileFilter<I> for I
where
    I: Iterator,
    I::Item: SavablePoint,
{
    fn save_to_file(self, path: &Path) -> Result<(), Error> {
        let mut writer = BufWriter::new(File::create(path)?);
        for item in self {
            item.write_to(&mut writer)?;
        }
        writer.flush()
    }
}
