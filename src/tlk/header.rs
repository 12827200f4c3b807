//! Содержит описания структур заголовка TLK файла и заголовков его строк

use std::fmt;
use std::io::{self, Read, Write};
use byteorder::{LE, ReadBytesExt, WriteBytesExt};

use crate::error::{Error, Result};

/// Четырехбайтовый тег, с которого начинается TLK файл: сигнатура или версия формата
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag(pub [u8; 4]);

impl Tag {
  /// Сигнатура TLK файла
  pub const TLK: Tag = Tag(*b"TLK ");
  /// Единственная поддерживаемая версия формата TLK файла
  pub const V3_0: Tag = Tag(*b"V3.0");

  /// Значимая часть тега, без завершающих пробелов и нулевых символов
  #[inline]
  pub fn trimmed(&self) -> &[u8] {
    trim_end(&self.0)
  }
  /// Читает 4 байта тега из потока
  #[inline]
  pub fn read<R: Read>(reader: &mut R) -> io::Result<Self> {
    let mut tag = [0u8; 4];
    reader.read_exact(&mut tag)?;
    Ok(Tag(tag))
  }
  /// Записывает 4 байта тега в поток
  #[inline]
  pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
    writer.write_all(&self.0)
  }
}

impl fmt::Debug for Tag {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "Tag({})", String::from_utf8_lossy(&self.0))
  }
}

/// Отбрасывает завершающие пробелы и нулевые символы
#[inline]
pub(crate) fn trim_end(bytes: &[u8]) -> &[u8] {
  let len = bytes.iter().rposition(|b| *b != 0 && *b != b' ').map_or(0, |i| i + 1);
  &bytes[..len]
}

///////////////////////////////////////////////////////////////////////////////////////////////////

/// Заголовок TLK файла. Занимает первые 20 байт файла
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
  /// Сигнатура файла, должна быть `TLK `
  pub signature: Tag,
  /// Версия формата файла, должна быть `V3.0`
  pub version: Tag,
  /// Идентификатор языка, на котором записаны строки таблицы
  pub language: u32,
  /// Количество строк в таблице
  pub string_count: u32,
  /// Смещение от начала файла области с текстом строк
  pub entries_offset: u32,
}

impl Header {
  /// Размер заголовка в байтах
  pub const SIZE: u64 = 20;

  /// Читает заголовок из потока. Сигнатура и версия не проверяются, для этого
  /// служит метод [`is_valid`](#method.is_valid)
  ///
  /// # Ошибки
  /// [`Error::TruncatedData`], если в потоке меньше 20 байт
  ///
  /// [`Error::TruncatedData`]: ../../error/enum.Error.html#variant.TruncatedData
  pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
    Self::read_impl(reader).map_err(|e| Error::truncated(e, "header"))
  }
  fn read_impl<R: Read>(reader: &mut R) -> io::Result<Self> {
    Ok(Header {
      signature:      Tag::read(reader)?,
      version:        Tag::read(reader)?,
      language:       reader.read_u32::<LE>()?,
      string_count:   reader.read_u32::<LE>()?,
      entries_offset: reader.read_u32::<LE>()?,
    })
  }
  /// Записывает заголовок в поток
  pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
    self.signature.write(writer)?;
    self.version.write(writer)?;
    writer.write_u32::<LE>(self.language)?;
    writer.write_u32::<LE>(self.string_count)?;
    writer.write_u32::<LE>(self.entries_offset)
  }
  /// Проверяет, что заголовок описывает TLK файл поддерживаемой версии
  #[inline]
  pub fn is_valid(&self) -> bool {
    self.signature.trimmed() == Tag::TLK.trimmed() && self.version.trimmed() == Tag::V3_0.trimmed()
  }
}

///////////////////////////////////////////////////////////////////////////////////////////////////

/// Строка содержит текст
pub const TEXT_PRESENT: u32 = 0x1;
/// Строка содержит ссылку на звуковой файл
pub const SOUND_PRESENT: u32 = 0x2;
/// Строка содержит длительность звука
pub const SOUND_LENGTH_PRESENT: u32 = 0x4;

/// Заголовок одной строки TLK таблицы. Заголовки всех строк записаны подряд сразу после
/// [заголовка файла](struct.Header.html)
#[derive(Debug, Clone, PartialEq)]
pub struct EntryHeader {
  /// Набор флагов, определяющих, какие из данных строки присутствуют
  pub flags: u32,
  /// Имя звукового файла, дополненное нулями до 16 байт
  pub sound: [u8; 16],
  /// Не используется
  pub volume_variance: u32,
  /// Не используется
  pub pitch_variance: u32,
  /// Смещение текста строки от начала области с текстом
  pub offset: u32,
  /// Длина текста строки в байтах
  pub size: u32,
  /// Длительность звука в секундах
  pub sound_length: f32,
}

impl EntryHeader {
  /// Размер заголовка строки в байтах
  pub const SIZE: u64 = 40;

  /// Читает 40 байт заголовка строки из потока
  ///
  /// # Ошибки
  /// [`Error::TruncatedData`], если в потоке меньше 40 байт
  ///
  /// [`Error::TruncatedData`]: ../../error/enum.Error.html#variant.TruncatedData
  pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
    let mut buf = [0u8; Self::SIZE as usize];
    reader.read_exact(&mut buf).map_err(|e| Error::truncated(e, "string header data"))?;

    let mut data = &buf[..];
    let flags = data.read_u32::<LE>()?;
    let mut sound = [0u8; 16];
    data.read_exact(&mut sound)?;

    Ok(EntryHeader {
      flags,
      sound,
      volume_variance: data.read_u32::<LE>()?,
      pitch_variance:  data.read_u32::<LE>()?,
      offset:          data.read_u32::<LE>()?,
      size:            data.read_u32::<LE>()?,
      sound_length:    data.read_f32::<LE>()?,
    })
  }
  /// Записывает 40 байт заголовка строки в поток
  pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
    writer.write_u32::<LE>(self.flags)?;
    writer.write_all(&self.sound)?;
    writer.write_u32::<LE>(self.volume_variance)?;
    writer.write_u32::<LE>(self.pitch_variance)?;
    writer.write_u32::<LE>(self.offset)?;
    writer.write_u32::<LE>(self.size)?;
    writer.write_f32::<LE>(self.sound_length)
  }
  /// Значимая часть имени звукового файла: все 16 байт без завершающих пробелов и нулевых
  /// символов. Нулевые символы внутри имени сохраняются
  #[inline]
  pub fn sound_name(&self) -> &[u8] {
    trim_end(&self.sound)
  }
}

#[cfg(test)]
mod tests {
  use std::io::Cursor;
  use super::{trim_end, EntryHeader, Header, Tag};
  use crate::error::Error;

  #[test]
  fn tags_ignore_padding() {
    assert_eq!(Tag::TLK.trimmed(), b"TLK");
    assert_eq!(Tag(*b"TLK\0").trimmed(), b"TLK");
    assert_eq!(trim_end(b"  \0"), b"");
    assert_eq!(trim_end(b"a b "), b"a b");
  }

  #[test]
  fn header_round_trip() {
    let header = Header {
      signature: Tag::TLK,
      version: Tag::V3_0,
      language: 2,
      string_count: 10,
      entries_offset: 420,
    };
    let mut buf = Vec::new();
    header.write(&mut buf).unwrap();
    assert_eq!(buf.len() as u64, Header::SIZE);

    let read = Header::read(&mut Cursor::new(buf)).unwrap();
    assert_eq!(read, header);
    assert!(read.is_valid());
  }

  #[test]
  fn wrong_version_is_invalid() {
    let header = Header {
      signature: Tag::TLK,
      version: Tag(*b"V3.2"),
      language: 0,
      string_count: 0,
      entries_offset: 20,
    };
    assert!(!header.is_valid());
    assert!(!Header { signature: Tag(*b"GFF "), version: Tag::V3_0, ..header }.is_valid());
  }

  #[test]
  fn short_header_is_truncated() {
    match Header::read(&mut Cursor::new(b"TLK V3.0".to_vec())) {
      Err(Error::TruncatedData(_)) => {},
      other => panic!("unexpected result: {:?}", other),
    }
  }

  #[test]
  fn sound_name_strips_only_trailing_padding() {
    let mut sound = [0u8; 16];
    sound[..5].copy_from_slice(b"vs_hi");
    sound[5] = b' ';
    let mut entry = EntryHeader {
      flags: 0, sound, volume_variance: 0, pitch_variance: 0, offset: 0, size: 0, sound_length: 0.0,
    };
    assert_eq!(entry.sound_name(), b"vs_hi");

    entry.sound[..5].copy_from_slice(b"ab\0cd");
    assert_eq!(entry.sound_name(), b"ab\0cd");

    let mut buf = Vec::new();
    entry.write(&mut buf).unwrap();
    assert_eq!(buf.len() as u64, EntryHeader::SIZE);
    assert_eq!(EntryHeader::read(&mut Cursor::new(buf)).unwrap(), entry);
  }
}
