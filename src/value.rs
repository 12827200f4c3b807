//! Типы полей GFF структур, значения полей и правила, по которым значение проверяется на
//! соответствие типу поля

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use serde::ser::{Serialize, Serializer};
use tracing::debug;

use crate::error::Error;
use crate::index::StructIndex;
use crate::settings::Settings;

/// Локализуемая строка: отображение идентификатора языка на текст для этого языка.
/// Итерирование производится в порядке возрастания идентификатора языка
pub type LocString = BTreeMap<u32, String>;

/// Типы полей, которые возможно встретить в GFF файле. Числовое значение варианта совпадает
/// с идентификатором типа, записываемым в файл
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum FieldType {
  /// Беззнаковое байтовое значение (от 0 до 255)
  Byte = 0,
  /// Символ текста в диапазоне `0x00-0xFF`
  Char,
  /// Беззнаковое целое (от 0 до 65535)
  Word,
  /// Знаковое целое (от -32768 до 32767)
  Short,
  /// Беззнаковое целое (от 0 до 4294967295)
  Dword,
  /// Знаковое целое (от -2147483648 до 2147483647)
  Int,
  /// Беззнаковое целое. Допускаются только значения, помещающиеся в 48 бит
  Dword64,
  /// Знаковое целое. Допускаются только значения, помещающиеся в 48 бит со знаком
  Int64,
  /// Число с плавающей запятой одинарной точности
  Float,
  /// Число с плавающей запятой двойной точности
  Double,
  /// Нелокализуемая строка (`CExoString`)
  String,
  /// Имя файла ресурса, до 16 или до 32 символов, в зависимости от [настроек](../settings/struct.Settings.html)
  ResRef,
  /// Локализуемая строка (`CExoLocString`)
  LocString,
  /// Произвольные данные любой длины
  Void,
  /// Вложенная структура
  Struct,
  /// Список структур
  List,
}

impl FieldType {
  /// Все типы полей в порядке их идентификаторов
  pub const ALL: [FieldType; 16] = [
    FieldType::Byte, FieldType::Char, FieldType::Word, FieldType::Short,
    FieldType::Dword, FieldType::Int, FieldType::Dword64, FieldType::Int64,
    FieldType::Float, FieldType::Double, FieldType::String, FieldType::ResRef,
    FieldType::LocString, FieldType::Void, FieldType::Struct, FieldType::List,
  ];

  /// Возвращает тип поля по его идентификатору в GFF файле
  #[inline]
  pub fn from_u32(value: u32) -> Option<Self> {
    Self::ALL.get(value as usize).copied()
  }
  /// Название типа, используемое в текстовых представлениях GFF файлов
  pub fn name(&self) -> &'static str {
    use self::FieldType::*;

    match *self {
      Byte      => "byte",
      Char      => "char",
      Word      => "word",
      Short     => "short",
      Dword     => "dword",
      Int       => "int",
      Dword64   => "dword64",
      Int64     => "int64",
      Float     => "float",
      Double    => "double",
      String    => "cexostr",
      ResRef    => "resref",
      LocString => "cexolocstr",
      Void      => "void",
      Struct    => "struct",
      List      => "list",
    }
  }
  /// Возвращает `true`, если данные поля указанного типа хранятся не в записи поля, а
  /// в отдельной области данных полей GFF файла. Для `Struct` и `List` возвращает `false`
  #[inline]
  pub fn is_complex(&self) -> bool {
    use self::FieldType::*;

    match *self {
      Dword64 | Int64 | Double | String | ResRef | LocString | Void => true,
      _ => false
    }
  }
  /// Возвращает `true`, если данные поля указанного типа хранятся прямо в записи поля
  #[inline]
  pub fn is_simple(&self) -> bool {
    !self.is_complex() && *self != FieldType::Struct && *self != FieldType::List
  }
}

impl fmt::Display for FieldType {
  #[inline]
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.write_str(self.name())
  }
}

impl FromStr for FieldType {
  type Err = Error;

  fn from_str(value: &str) -> Result<Self, Error> {
    Self::ALL.iter()
      .find(|t| t.name() == value)
      .copied()
      .ok_or_else(|| Error::UnknownFieldType(value.to_owned()))
  }
}

impl Serialize for FieldType {
  #[inline]
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where S: Serializer,
  {
    serializer.serialize_str(self.name())
  }
}

///////////////////////////////////////////////////////////////////////////////////////////////////

/// Значение поля GFF структуры. Одна и та же форма значения может подходить нескольким
/// типам полей: например, `Integer` является допустимым значением для всех целочисленных
/// типов, если попадает в их диапазон. Какие значения допустимы для какого типа, определяет
/// функция [`valid_for`](fn.valid_for.html)
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
  /// Целое число
  Integer(i64),
  /// Число с плавающей запятой
  Float(f64),
  /// Строка текста
  String(String),
  /// Произвольные двоичные данные
  Bytes(Vec<u8>),
  /// Локализуемая строка
  LocString(LocString),
  /// Ссылка на вложенную структуру
  Struct(StructIndex),
  /// Упорядоченный список ссылок на структуры
  List(Vec<StructIndex>),
}

impl Value {
  /// Перечисляет все структуры, на которые ссылается данное значение
  #[inline]
  pub fn structs(&self) -> &[StructIndex] {
    match self {
      Value::Struct(index) => std::slice::from_ref(index),
      Value::List(items) => items,
      _ => &[],
    }
  }
}

/// Макрос для реализации конвертации примитивного типа в один из вариантов значения
macro_rules! value_from {
  ($($type:ty),* => $variant:ident) => ($(
    impl From<$type> for Value {
      #[inline]
      fn from(value: $type) -> Self { Value::$variant(value.into()) }
    }
  )*);
}
value_from!(u8, i8, u16, i16, u32, i32, i64 => Integer);
value_from!(f32, f64 => Float);
value_from!(String, &str => String);
value_from!(Vec<u8>, &[u8] => Bytes);
value_from!(LocString => LocString);
value_from!(StructIndex => Struct);
value_from!(Vec<StructIndex> => List);

/// Проверяет, что целое значение лежит в диапазоне `[min; max]`
#[inline]
fn in_range(value: &Value, min: i64, max: i64) -> bool {
  match *value {
    Value::Integer(v) => min <= v && v <= max,
    _ => false,
  }
}

/// Проверяет, является ли значение `value` допустимым для поля типа `field_type`.
///
/// Функция не меняет никакого состояния, однако для ссылок на ресурсы длиннее 16 байт
/// выводит отладочное сообщение, если это не отключено настройкой [`Settings::resref32`].
///
/// Для структур и списков проверяется только форма значения; то, что структуры существуют
/// в хранилище, проверяет само хранилище.
///
/// [`Settings::resref32`]: ../settings/struct.Settings.html#structfield.resref32
pub fn valid_for(value: &Value, field_type: FieldType, settings: &Settings) -> bool {
  use self::FieldType::*;

  match field_type {
    Byte | Char => in_range(value, 0, 0xff),

    Short   => in_range(value, -0x8000, 0x7fff),
    Word    => in_range(value, 0, 0xffff),

    Int     => in_range(value, -0x8000_0000, 0x7fff_ffff),
    Dword   => in_range(value, 0, 0xffff_ffff),

    Int64   => in_range(value, -0x8000_0000_0000, 0x7fff_ffff_ffff),
    Dword64 => in_range(value, 0, 0xffff_ffff_ffff),

    Float | Double => matches!(value, Value::Float(_)),

    ResRef => match value {
      Value::String(s) => {
        let len = s.chars().count();
        if !settings.resref32 && len > 16 {
          debug!(value = %s, len,
            "resref too long for NWN1, set env NWN_LIB_RESREF32=1 to turn off warning for NWN2");
        }
        len <= settings.resref_limit()
      },
      _ => false,
    },

    String    => matches!(value, Value::String(_)),
    LocString => matches!(value, Value::LocString(_)),
    Struct    => matches!(value, Value::Struct(_)),
    List      => matches!(value, Value::List(_)),
    Void      => matches!(value, Value::Bytes(_)),
  }
}

#[cfg(test)]
mod tests {
  use std::collections::BTreeMap;
  use tracing_test::traced_test;

  use super::{valid_for, FieldType, Value};
  use crate::index::StructIndex;
  use crate::settings::Settings;

  fn check(field_type: FieldType, valid: &[Value], invalid: &[Value]) {
    let settings = Settings { resref16: true, ..Settings::default() };
    for v in valid {
      assert!(valid_for(v, field_type, &Settings::default()), "{:?} must be valid for {}", v, field_type);
    }
    for v in invalid {
      assert!(!valid_for(v, field_type, &settings), "{:?} must be invalid for {}", v, field_type);
    }
  }

  fn int(value: i64) -> Value { Value::Integer(value) }
  fn float(value: f64) -> Value { Value::Float(value) }

  fn loc() -> Value {
    let mut map = BTreeMap::new();
    map.insert(0, "Hello".to_owned());
    map.insert(1, "Bonjour".to_owned());
    Value::LocString(map)
  }

  #[test]
  fn byte_and_char() {
    for t in &[FieldType::Byte, FieldType::Char] {
      check(*t,
        &[int(0), int(255)],
        &[int(-1), int(256), float(1.0), "1".into()],
      );
    }
  }

  #[test]
  fn short_and_word() {
    check(FieldType::Short,
      &[int(-0x8000), int(0x7fff)],
      &[int(-0x8001), int(0x8000), float(0.5)],
    );
    check(FieldType::Word,
      &[int(0), int(0xffff)],
      &[int(-1), int(0x10000), "x".into()],
    );
  }

  #[test]
  fn int_and_dword() {
    check(FieldType::Int,
      &[int(-0x8000_0000), int(0x7fff_ffff)],
      &[int(-0x8000_0001), int(0x8000_0000), float(1.0)],
    );
    check(FieldType::Dword,
      &[int(0), int(0xffff_ffff)],
      &[int(-1), int(0x1_0000_0000), Value::Bytes(vec![1])],
    );
  }

  #[test]
  fn wide_integers_use_48_bit_bounds() {
    check(FieldType::Int64,
      &[int(-0x8000_0000_0000), int(0x7fff_ffff_ffff)],
      &[int(-0x8000_0000_0001), int(0x8000_0000_0000), int(i64::max_value())],
    );
    check(FieldType::Dword64,
      &[int(0), int(0xffff_ffff_ffff)],
      &[int(-1), int(0x1_0000_0000_0000), float(2.0)],
    );
  }

  #[test]
  fn floats() {
    for t in &[FieldType::Float, FieldType::Double] {
      check(*t,
        &[float(0.0), Value::from(-1.5f32), float(std::f64::MAX)],
        &[int(0), "0.0".into()],
      );
    }
  }

  #[test]
  fn strings() {
    check(FieldType::String,
      &["".into(), "any text at all, of any length".into()],
      &[int(1), Value::Bytes(b"text".to_vec()), loc()],
    );
    check(FieldType::ResRef,
      &["".into(), "nw_it_mring021".into(), "x".repeat(32).into()],
      &["x".repeat(17).into(), "x".repeat(33).into(), int(1)],
    );
  }

  #[test]
  fn resref_limit_follows_settings() {
    let value: Value = "x".repeat(20).into();
    assert!(valid_for(&value, FieldType::ResRef, &Settings::default()));
    assert!(!valid_for(&value, FieldType::ResRef, &Settings { resref16: true, resref32: false }));
    let exact: Value = "x".repeat(16).into();
    assert!(valid_for(&exact, FieldType::ResRef, &Settings { resref16: true, resref32: false }));
  }

  #[test]
  fn resref_length_counts_characters() {
    // 17 символов, 34 байта в UTF-8
    let value: Value = "é".repeat(17).into();
    assert!(valid_for(&value, FieldType::ResRef, &Settings::default()));
    assert!(!valid_for(&value, FieldType::ResRef, &Settings { resref16: true, resref32: false }));

    let value: Value = "é".repeat(16).into();
    assert!(valid_for(&value, FieldType::ResRef, &Settings { resref16: true, resref32: false }));
    assert!(!valid_for(&"é".repeat(33).into(), FieldType::ResRef, &Settings::default()));
  }

  #[traced_test]
  #[test]
  fn long_resref_is_reported() {
    let value: Value = "a_very_long_resref_name".into();
    assert!(valid_for(&value, FieldType::ResRef, &Settings::default()));
    assert!(logs_contain("resref too long"));
  }

  #[traced_test]
  #[test]
  fn long_resref_report_can_be_disabled() {
    let value: Value = "another_long_resref_name".into();
    let settings = Settings { resref16: false, resref32: true };
    assert!(valid_for(&value, FieldType::ResRef, &settings));
    assert!(!logs_contain("resref too long"));
  }

  #[test]
  fn compound_values() {
    check(FieldType::LocString, &[loc(), Value::LocString(BTreeMap::new())], &["Hello".into(), int(0)]);
    check(FieldType::Struct, &[StructIndex(1).into()], &[vec![StructIndex(1)].into(), int(1)]);
    check(FieldType::List, &[vec![StructIndex(1), StructIndex(2)].into(), Vec::<StructIndex>::new().into()], &[StructIndex(1).into()]);
    check(FieldType::Void, &[Value::Bytes(vec![0xde, 0xad, 0xbe, 0xef]), Value::Bytes(vec![])], &["deadbeef".into(), int(0)]);
  }

  #[test]
  fn type_names_round_trip() {
    for t in FieldType::ALL.iter() {
      assert_eq!(t.name().parse::<FieldType>().unwrap(), *t);
      assert_eq!(FieldType::from_u32(*t as u32), Some(*t));
    }
    assert!("integer".parse::<FieldType>().is_err());
    assert_eq!(FieldType::from_u32(16), None);
  }

  #[test]
  fn storage_classes() {
    assert!(FieldType::Int.is_simple());
    assert!(FieldType::Int64.is_complex());
    assert!(!FieldType::List.is_simple());
    assert!(!FieldType::List.is_complex());
  }
}
