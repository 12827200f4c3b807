//! Набор TLK таблиц, из которого строки выбираются с учетом пола говорящего и того,
//! относится ли идентификатор к основной или к пользовательской таблице

use std::io::{Read, Seek};
use tracing::trace;

use crate::Gender;
use crate::error::{Error, Result};
use super::{Entry, TalkTable};

/// Идентификаторы, начиная с этого, относятся к пользовательской таблице. Номер строки
/// в пользовательской таблице получается вычитанием этого значения из идентификатора
pub const CUSTOM_BASE: u64 = 0x0100_0000;

/// Набор из основной и необязательных пользовательской и женских таблиц.
///
/// Отсутствующая женская таблица заменяется мужской таблицей того же вида
#[derive(Debug)]
pub struct TalkTableSet<R: Read + Seek> {
  default_male: TalkTable<R>,
  default_female: Option<TalkTable<R>>,
  custom_male: Option<TalkTable<R>>,
  custom_female: Option<TalkTable<R>>,
}

impl<R: Read + Seek> TalkTableSet<R> {
  /// Создает набор, состоящий только из основной таблицы
  #[inline]
  pub fn new(default_male: TalkTable<R>) -> Self {
    TalkTableSet { default_male, default_female: None, custom_male: None, custom_female: None }
  }
  /// Открывает все таблицы набора из указанных потоков
  pub fn open(
    default_male: R,
    default_female: Option<R>,
    custom_male: Option<R>,
    custom_female: Option<R>,
  ) -> Result<Self> {
    Ok(TalkTableSet {
      default_male: TalkTable::new(default_male)?,
      default_female: default_female.map(TalkTable::new).transpose()?,
      custom_male: custom_male.map(TalkTable::new).transpose()?,
      custom_female: custom_female.map(TalkTable::new).transpose()?,
    })
  }
  /// Задает основную женскую таблицу
  #[inline]
  pub fn with_default_female(mut self, table: TalkTable<R>) -> Self {
    self.default_female = Some(table);
    self
  }
  /// Задает пользовательскую мужскую таблицу
  #[inline]
  pub fn with_custom_male(mut self, table: TalkTable<R>) -> Self {
    self.custom_male = Some(table);
    self
  }
  /// Задает пользовательскую женскую таблицу
  #[inline]
  pub fn with_custom_female(mut self, table: TalkTable<R>) -> Self {
    self.custom_female = Some(table);
    self
  }

  /// Основная мужская таблица
  #[inline]
  pub fn default_male(&self) -> &TalkTable<R> { &self.default_male }
  /// Основная женская таблица, или мужская, если женская не задана
  #[inline]
  pub fn default_female(&self) -> &TalkTable<R> {
    self.default_female.as_ref().unwrap_or(&self.default_male)
  }
  /// Пользовательская мужская таблица
  #[inline]
  pub fn custom_male(&self) -> Option<&TalkTable<R>> { self.custom_male.as_ref() }
  /// Пользовательская женская таблица, или мужская, если женская не задана
  #[inline]
  pub fn custom_female(&self) -> Option<&TalkTable<R>> {
    self.custom_female.as_ref().or_else(|| self.custom_male.as_ref())
  }

  /// Ищет строку по идентификатору в таблице, соответствующей идентификатору и полу.
  ///
  /// Идентификаторы меньше [`CUSTOM_BASE`] ищутся в основных таблицах, остальные --
  /// в пользовательских.
  ///
  /// # Ошибки
  /// - [`Error::InvalidId`], если идентификатор не помещается в 32 бита
  /// - [`Error::NoCustomTable`], если запрошена пользовательская строка, но пользовательская
  ///   мужская таблица не задана
  /// - все ошибки метода [`TalkTable::lookup`]
  ///
  /// [`CUSTOM_BASE`]: constant.CUSTOM_BASE.html
  /// [`Error::InvalidId`]: ../error/enum.Error.html#variant.InvalidId
  /// [`Error::NoCustomTable`]: ../error/enum.Error.html#variant.NoCustomTable
  /// [`TalkTable::lookup`]: struct.TalkTable.html#method.lookup
  pub fn lookup(&mut self, id: u64, gender: Gender) -> Result<Entry> {
    if id > u32::max_value() as u64 {
      return Err(Error::InvalidId(id));
    }
    if id < CUSTOM_BASE {
      let table = match (gender, self.default_female.as_mut()) {
        (Gender::Female, Some(female)) => female,
        _ => &mut self.default_male,
      };
      trace!(id, ?gender, "looking up default table");
      return table.lookup(id as u32);
    }

    let male = match self.custom_male {
      Some(ref mut table) => table,
      None => return Err(Error::NoCustomTable),
    };
    let table = match (gender, self.custom_female.as_mut()) {
      (Gender::Female, Some(female)) => female,
      _ => male,
    };
    let local = (id - CUSTOM_BASE) as u32;
    trace!(id, local, ?gender, "looking up custom table");
    table.lookup(local)
  }
}
