//! Реализация структуры, описывающей ошибки построения GFF дерева и чтения TLK таблиц

use std::borrow::Cow;
use std::io;
use std::result;
use thiserror::Error;

use crate::Label;
use crate::value::FieldType;

/// Виды ошибок, которые могут возникнуть при работе с GFF деревом или при чтении TLK-файла
#[derive(Error, Debug)]
pub enum Error {
  /// Произошла ошибка чтения из нижележащего потока, не связанная с его преждевременным окончанием
  #[error(transparent)]
  Io(#[from] io::Error),
  /// Произошла ошибка декодирования строки, например, из-за использования символа,
  /// не поддерживаемого кодировкой
  #[error("{0}")]
  Encoding(Cow<'static, str>),
  /// Некорректное значение для метки. Метка не должна превышать по длине 16 байт в UTF-8,
  /// но указанное значение больше. Ошибка содержит длину текста, который пытаются преобразовать
  #[error("Too long label: label can contain up to 16 bytes, but string contains {0} bytes in UTF-8")]
  TooLongLabel(usize),

  /// Значение не удовлетворяет ограничениям, накладываемым типом поля
  #[error("{label}: value not valid for type '{field_type}'")]
  InvalidFieldValue {
    /// Метка поля, в которое пытались записать значение
    label: Label,
    /// Тип, ограничениям которого значение не удовлетворяет
    field_type: FieldType,
  },
  /// Путь запрошен для поля или структуры, не привязанных к корню дерева
  #[error("{0}: field not bound to a parent")]
  UnboundField(String),
  /// Название типа поля не соответствует ни одному из известных типов
  #[error("Unknown field type: '{0}'")]
  UnknownFieldType(String),
  /// Структура уже содержит другое поле с такой меткой
  #[error("Struct already contains field '{0}'")]
  DuplicateLabel(Label),

  /// Сигнатура или версия TLK-файла не совпадают с ожидаемыми
  #[error("The given stream does not describe a valid tlk table")]
  InvalidFormat,
  /// Запрошенный идентификатор строки лежит вне диапазона `[0; size)` таблицы
  #[error("No such string ID: {id} (table contains {size} strings)")]
  OutOfRange {
    /// Запрошенный идентификатор
    id: u32,
    /// Количество строк в таблице
    size: u32,
  },
  /// Поток закончился раньше, чем была прочитана требуемая область данных. Содержит
  /// название области
  #[error("Cannot read TLK file, missing {0}")]
  TruncatedData(&'static str),
  /// Идентификатор строки не помещается в 32 бита
  #[error("Invalid Tlk ID: {0}")]
  InvalidId(u64),
  /// Запрошена строка из пользовательской таблицы, но она не была указана
  #[error("Wanted a custom ID, but no custom talk table has been specified")]
  NoCustomTable,
}
/// Тип результата, используемый в методах данной библиотеки
pub type Result<T> = result::Result<T, Error>;

impl Error {
  /// Превращает ошибку ввода-вывода в [`TruncatedData`], если она вызвана
  /// преждевременным окончанием потока
  ///
  /// [`TruncatedData`]: #variant.TruncatedData
  pub(crate) fn truncated(err: io::Error, region: &'static str) -> Self {
    match err.kind() {
      io::ErrorKind::UnexpectedEof => Error::TruncatedData(region),
      _ => Error::Io(err),
    }
  }
}

/// Реализация для конвертации из ошибок кодирования библиотеки `encodings`
impl From<Cow<'static, str>> for Error {
  fn from(value: Cow<'static, str>) -> Self { Error::Encoding(value) }
}
