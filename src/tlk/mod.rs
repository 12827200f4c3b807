//! Чтение строк из таблиц локализованных строк (TLK файлов) по их идентификатору.
//!
//! Таблица читается лениво: при создании [`TalkTable`] читается и проверяется только заголовок,
//! а каждая строка читается из потока в момент ее запроса.
//!
//! # Пример
//! ```no_run
//! use std::fs::File;
//! use aurora_gff::Gender;
//! use aurora_gff::tlk::{TalkTable, TalkTableSet};
//!
//! let dialog = TalkTable::new(File::open("dialog.tlk")?)?;
//! let mut set = TalkTableSet::new(dialog);
//! let entry = set.lookup(42, Gender::Female)?;
//! println!("{}: {}", entry.sound, entry.text);
//! # Ok::<(), aurora_gff::error::Error>(())
//! ```
//!
//! [`TalkTable`]: struct.TalkTable.html

use std::fmt;
use std::io::{Read, Seek, SeekFrom};
use encoding::{DecoderTrap, EncodingRef};
use encoding::all::UTF_8;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use tracing::trace;

use crate::Language;
use crate::error::{Error, Result};

mod header;
mod set;

pub use self::header::{EntryHeader, Header, Tag};
pub use self::header::{SOUND_LENGTH_PRESENT, SOUND_PRESENT, TEXT_PRESENT};
pub use self::set::{TalkTableSet, CUSTOM_BASE};

/// Идентификатор, означающий отсутствие строки. Для него всегда возвращается пустая строка
pub const EMPTY_ID: u32 = 0xFFFF_FFFF;

/// Строка TLK таблицы
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entry {
  /// Текст строки. Пустой, если у строки нет текста
  pub text: String,
  /// Имя звукового файла, который проигрывается вместе с показом строки. Пустое, если
  /// у строки нет звука
  pub sound: String,
  /// Длительность звука в секундах, или `0`, если она не указана
  pub sound_length: f32,
}

impl Entry {
  /// Возвращает `true`, если у строки нет ни текста, ни звука
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.text.is_empty() && self.sound.is_empty()
  }
}

impl Serialize for Entry {
  fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where S: Serializer,
  {
    let mut s = serializer.serialize_struct("Entry", 3)?;
    s.serialize_field("text", &self.text)?;
    s.serialize_field("sound", &self.sound)?;
    s.serialize_field("sound_length", &self.sound_length)?;
    s.end()
  }
}

///////////////////////////////////////////////////////////////////////////////////////////////////

/// Таблица локализованных строк одного языка, читаемая из потока.
///
/// Каждый запрос строки перемещает позицию в потоке, поэтому для поиска нужна изменяемая
/// ссылка на таблицу.
pub struct TalkTable<R: Read + Seek> {
  /// Источник данных для чтения строк
  reader: R,
  /// Заголовок таблицы, прочитанный при ее открытии
  header: Header,
  /// Кодировка, используемая для декодирования текста и имен звуков
  encoding: EncodingRef,
  /// Способ обработки некорректных для кодировки символов при декодировании
  trap: DecoderTrap,
}

impl<R: Read + Seek> TalkTable<R> {
  /// Открывает таблицу, строки которой записаны в кодировке UTF-8. Некорректные символы
  /// приводят к ошибке при чтении строки.
  ///
  /// Заголовок читается с текущей позиции потока, а смещения строк отсчитываются от начала
  /// потока.
  ///
  /// # Ошибки
  /// - [`Error::TruncatedData`], если поток короче заголовка таблицы
  /// - [`Error::InvalidFormat`], если сигнатура или версия не соответствуют TLK V3.0
  ///
  /// [`Error::TruncatedData`]: ../error/enum.Error.html#variant.TruncatedData
  /// [`Error::InvalidFormat`]: ../error/enum.Error.html#variant.InvalidFormat
  #[inline]
  pub fn new(reader: R) -> Result<Self> {
    Self::with_encoding(reader, UTF_8, DecoderTrap::Strict)
  }
  /// Открывает таблицу, строки которой записаны в указанной кодировке. Ошибки такие же,
  /// как у метода [`new`](#method.new)
  pub fn with_encoding(mut reader: R, encoding: EncodingRef, trap: DecoderTrap) -> Result<Self> {
    let header = Header::read(&mut reader)?;
    if !header.is_valid() {
      return Err(Error::InvalidFormat);
    }
    trace!(
      language = header.language,
      size = header.string_count,
      entries_offset = header.entries_offset,
      encoding = encoding.name(),
      "opened talk table"
    );
    Ok(TalkTable { reader, header, encoding, trap })
  }

  /// Заголовок таблицы
  #[inline]
  pub fn header(&self) -> &Header { &self.header }
  /// Количество строк в таблице. Корректные идентификаторы строк лежат в диапазоне `[0; size)`
  #[inline]
  pub fn size(&self) -> u32 { self.header.string_count }
  /// Синоним для [`size`](#method.size)
  #[inline]
  pub fn len(&self) -> usize { self.size() as usize }
  /// Возвращает `true`, если в таблице нет ни одной строки
  #[inline]
  pub fn is_empty(&self) -> bool { self.size() == 0 }
  /// Идентификатор языка таблицы, как он записан в заголовке
  #[inline]
  pub fn language(&self) -> u32 { self.header.language }
  /// Язык таблицы, если его идентификатор известен
  #[inline]
  pub fn language_kind(&self) -> Option<Language> { Language::from_id(self.language()) }
  /// Возвращает поток, из которого читается таблица
  #[inline]
  pub fn into_inner(self) -> R { self.reader }

  /// Читает строку с указанным идентификатором.
  ///
  /// Для идентификатора [`EMPTY_ID`] возвращается пустая строка без обращения к потоку.
  /// Текст, имя звука и его длительность заполняются только при наличии соответствующего
  /// флага, иначе остаются пустыми.
  ///
  /// # Ошибки
  /// - [`Error::OutOfRange`], если идентификатор не меньше [размера](#method.size) таблицы
  /// - [`Error::TruncatedData`], если поток закончился раньше, чем был прочитан заголовок
  ///   строки или ее текст
  /// - [`Error::Encoding`], если текст не может быть декодирован в кодировке таблицы
  ///
  /// [`EMPTY_ID`]: constant.EMPTY_ID.html
  /// [`Error::OutOfRange`]: ../error/enum.Error.html#variant.OutOfRange
  /// [`Error::TruncatedData`]: ../error/enum.Error.html#variant.TruncatedData
  /// [`Error::Encoding`]: ../error/enum.Error.html#variant.Encoding
  pub fn lookup(&mut self, id: u32) -> Result<Entry> {
    if id == EMPTY_ID {
      return Ok(Entry::default());
    }
    let size = self.size();
    if id >= size {
      return Err(Error::OutOfRange { id, size });
    }

    self.reader.seek(SeekFrom::Start(Header::SIZE + id as u64 * EntryHeader::SIZE))?;
    let entry = EntryHeader::read(&mut self.reader)?;
    trace!(id, flags = entry.flags, offset = entry.offset, size = entry.size, "read string header");

    // Текст читается всегда, даже если флаг его наличия не установлен
    let start = self.header.entries_offset as u64 + entry.offset as u64;
    self.reader.seek(SeekFrom::Start(start))?;
    let mut text = Vec::new();
    (&mut self.reader).take(entry.size as u64).read_to_end(&mut text)?;
    if text.len() != entry.size as usize {
      return Err(Error::TruncatedData("string text data"));
    }

    let mut result = Entry::default();
    if entry.flags & TEXT_PRESENT != 0 {
      result.text = self.encoding.decode(&text, self.trap)?;
    }
    if entry.flags & SOUND_PRESENT != 0 {
      result.sound = self.encoding.decode(entry.sound_name(), self.trap)?;
    }
    if entry.flags & SOUND_LENGTH_PRESENT != 0 {
      result.sound_length = entry.sound_length;
    }
    Ok(result)
  }
}

impl<R: Read + Seek> fmt::Debug for TalkTable<R> {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.debug_struct("TalkTable")
      .field("header", &self.header)
      .field("encoding", &self.encoding.name())
      .finish()
  }
}
