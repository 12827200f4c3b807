//! Содержит реализацию структуры, описывающей метку поля GFF структуры, и типажей для
//! конвертации строк в метку и обратно

use std::fmt;
use std::str::{from_utf8, FromStr, Utf8Error};
use serde::ser::{Serialize, Serializer};

use crate::error::Error;

/// Максимальная длина метки в байтах
const LABEL_SIZE: usize = 16;

/// Метка поля GFF структуры. На диске метка хранится как массив из 16 байт, дополненный
/// нулями, поэтому ее текст не может быть длиннее 16 байт в UTF-8
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Label([u8; LABEL_SIZE]);

impl Label {
  /// Пытается создать метку из указанного массива байт.
  ///
  /// # Ошибки
  /// Если длина среза превышает 16 байт, возвращается ошибка
  /// [`Error::TooLongLabel`](./error/enum.Error.html#variant.TooLongLabel)
  pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
    if bytes.len() > LABEL_SIZE {
      return Err(Error::TooLongLabel(bytes.len()));
    }

    let mut storage = [0u8; LABEL_SIZE];
    storage[..bytes.len()].copy_from_slice(bytes);
    Ok(Label(storage))
  }
  /// Значимая часть метки: байты до первого нулевого символа
  #[inline]
  pub fn as_bytes(&self) -> &[u8] {
    let len = self.0.iter().position(|b| *b == 0).unwrap_or(LABEL_SIZE);
    &self.0[..len]
  }
  /// Возвращает текст метки, если он записан в `UTF-8`
  #[inline]
  pub fn as_str(&self) -> Result<&str, Utf8Error> {
    from_utf8(self.as_bytes())
  }
}

impl fmt::Debug for Label {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self.as_str() {
      Ok(value) => write!(f, "Label({})", value),
      Err(_) => write!(f, "Label({:?})", self.as_bytes()),
    }
  }
}

impl fmt::Display for Label {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.write_str(&String::from_utf8_lossy(self.as_bytes()))
  }
}

impl From<[u8; LABEL_SIZE]> for Label {
  fn from(arr: [u8; LABEL_SIZE]) -> Self { Label(arr) }
}

impl AsRef<[u8]> for Label {
  fn as_ref(&self) -> &[u8] { self.as_bytes() }
}

impl FromStr for Label {
  type Err = Error;

  #[inline]
  fn from_str(value: &str) -> Result<Self, Error> {
    Self::from_bytes(value.as_bytes())
  }
}

impl PartialEq<str> for Label {
  fn eq(&self, other: &str) -> bool { self.as_bytes() == other.as_bytes() }
}
impl<'a> PartialEq<&'a str> for Label {
  fn eq(&self, other: &&'a str) -> bool { self.as_bytes() == other.as_bytes() }
}

impl Serialize for Label {
  #[inline]
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where S: Serializer,
  {
    match self.as_str() {
      Ok(str) => serializer.serialize_str(str),
      Err(_)  => serializer.serialize_bytes(self.as_bytes()),
    }
  }
}
