//! Содержит перечисления, описывающие язык и пол, для которых предназначен локализованный текст
use std::fmt;

/// Известные языки, на которых могут быть записаны TLK таблицы и локализуемые строки
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Language {
  /// Английский язык
  English = 0,
  /// Французский язык
  French  = 1,
  /// Немецкий язык
  German  = 2,
  /// Итальянский язык
  Italian = 3,
  /// Испанский язык
  Spanish = 4,
  /// Польский язык
  Polish  = 5,
  /// Корейский язык
  Korean  = 128,
  /// Традиционный китайский
  ChineseTraditional = 129,
  /// Упрощенный китайский
  ChineseSimplified  = 130,
  /// Японский
  Japanese= 131,
}

impl Language {
  /// Определяет язык по его идентификатору. Для неизвестных идентификаторов возвращает `None`
  pub fn from_id(id: u32) -> Option<Self> {
    use self::Language::*;

    Some(match id {
      0   => English,
      1   => French,
      2   => German,
      3   => Italian,
      4   => Spanish,
      5   => Polish,
      128 => Korean,
      129 => ChineseTraditional,
      130 => ChineseSimplified,
      131 => Japanese,
      _ => return None,
    })
  }
  /// Идентификатор языка, записываемый в файлы
  #[inline]
  pub fn id(self) -> u32 { self as u32 }
}

impl fmt::Display for Language {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    use self::Language::*;

    f.write_str(match *self {
      English => "english",
      French  => "french",
      German  => "german",
      Italian => "italian",
      Spanish => "spanish",
      Polish  => "polish",
      Korean  => "korean",
      ChineseTraditional => "chinese_traditional",
      ChineseSimplified  => "chinese_simplified",
      Japanese => "japanese",
    })
  }
}

/// Пол персонажа, для которого выбирается текст строки
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
  /// Текст для персонажа мужского или неопределенного пола
  Male,
  /// Текст для персонажа женского пола
  Female,
}

impl Default for Gender {
  #[inline]
  fn default() -> Self { Gender::Male }
}

#[cfg(test)]
mod tests {
  use super::{Gender, Language};

  #[test]
  fn language_ids() {
    assert_eq!(Language::from_id(0), Some(Language::English));
    assert_eq!(Language::from_id(131), Some(Language::Japanese));
    assert_eq!(Language::from_id(6), None);
    assert_eq!(Language::ChineseSimplified.id(), 130);
    assert_eq!(Language::Polish.to_string(), "polish");
  }

  #[test]
  fn male_is_default_gender() {
    assert_eq!(Gender::default(), Gender::Male);
  }
}
