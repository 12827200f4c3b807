//! Настройки, влияющие на проверку значений полей

use std::env;

/// Имя переменной окружения, включающей ограничение длины `resref` в 16 байт
pub const RESREF16_VAR: &str = "NWN_LIB_RESREF16";
/// Имя переменной окружения, отключающей предупреждение о `resref` длиннее 16 байт
pub const RESREF32_VAR: &str = "NWN_LIB_RESREF32";

/// Неизменяемый набор настроек, передаваемый в функции проверки значений.
///
/// Neverwinter Nights ограничивает ссылки на ресурсы 16 байтами, Neverwinter Nights 2 -- 32
/// байтами. По умолчанию допускаются ссылки длиной до 32 байт, а о ссылках длиннее 16 байт
/// выводится диагностическое сообщение
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Settings {
  /// Если `true`, ссылки на ресурсы (`resref`) длиннее 16 байт считаются некорректными
  pub resref16: bool,
  /// Если `true`, ссылки на ресурсы длиной от 17 до 32 байт не порождают диагностического
  /// сообщения
  pub resref32: bool,
}

impl Settings {
  /// Читает настройки из переменных окружения [`NWN_LIB_RESREF16`] и [`NWN_LIB_RESREF32`].
  /// Настройка включена, если переменная задана, не пуста и не равна `0`
  ///
  /// [`NWN_LIB_RESREF16`]: constant.RESREF16_VAR.html
  /// [`NWN_LIB_RESREF32`]: constant.RESREF32_VAR.html
  pub fn from_env() -> Self {
    Settings {
      resref16: flag(env::var_os(RESREF16_VAR)),
      resref32: flag(env::var_os(RESREF32_VAR)),
    }
  }
  /// Максимальная допустимая длина ссылки на ресурс в байтах
  #[inline]
  pub fn resref_limit(&self) -> usize {
    if self.resref16 { 16 } else { 32 }
  }
}

#[inline]
fn flag<S: AsRef<std::ffi::OsStr>>(value: Option<S>) -> bool {
  match value {
    Some(value) => {
      let value = value.as_ref();
      !value.is_empty() && value != "0"
    },
    None => false,
  }
}

#[cfg(test)]
mod tests {
  use super::{flag, Settings};

  #[test]
  fn default_allows_32_byte_resrefs() {
    let settings = Settings::default();
    assert_eq!(settings.resref_limit(), 32);
    assert!(!settings.resref32);
  }

  #[test]
  fn resref16_narrows_limit() {
    let settings = Settings { resref16: true, ..Settings::default() };
    assert_eq!(settings.resref_limit(), 16);
  }

  #[test]
  fn env_flag_values() {
    assert!(!flag(None::<&str>));
    assert!(!flag(Some("")));
    assert!(!flag(Some("0")));
    assert!(flag(Some("1")));
    assert!(flag(Some("yes")));
  }
}
