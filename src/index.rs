//! Содержит описание индексов структур и полей внутри хранилища [`Gff`](../gff/struct.Gff.html)

use std::fmt;

/// Макрос для объявления типизированной обертки над числом, представляющим индекс
/// одного из элементов в хранилище GFF дерева.
///
/// # Параметры
/// - `$name`: Имя генерируемой структуры
/// - `$prefix`: Префикс, используемый при отладочном выводе
macro_rules! index {
  ($(#[$attrs:meta])* $name:ident, $prefix:expr) => (
    $(#[$attrs])*
    #[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
    pub struct $name(pub(crate) u32);

    impl $name {
      /// Позиция элемента в хранилище
      #[inline]
      pub(crate) fn get(self) -> usize { self.0 as usize }
    }
    impl fmt::Debug for $name {
      fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}#{}", $prefix, self.0)
      }
    }
  );
}

index!(
  /// Номер структуры в хранилище GFF дерева. Выдается при создании структуры и действителен
  /// только для того хранилища, которое его выдало
  StructIndex, "struct"
);
index!(
  /// Номер поля в хранилище GFF дерева. Выдается при создании поля и действителен только
  /// для того хранилища, которое его выдало
  FieldIndex, "field"
);
