//! Представления полей и структур GFF дерева только для чтения

use std::fmt;

use crate::Label;
use crate::error::{Error, Result};
use crate::index::{FieldIndex, StructIndex};
use crate::value::{valid_for, FieldType, LocString, Value};
use super::{FieldData, Gff, StructData};
use super::flatten::Flatten;

/// Поле GFF дерева, доступное для чтения. Для изменения поля используются методы
/// хранилища [`Gff`](struct.Gff.html), принимающие [`index`](#method.index) поля
#[derive(Clone, Copy)]
pub struct FieldRef<'a> {
  gff: &'a Gff,
  index: FieldIndex,
}

impl<'a> FieldRef<'a> {
  #[inline]
  pub(crate) fn new(gff: &'a Gff, index: FieldIndex) -> Self {
    FieldRef { gff, index }
  }
  #[inline]
  fn data(&self) -> &'a FieldData {
    &self.gff.fields[self.index.get()]
  }
  #[inline]
  pub(crate) fn gff(&self) -> &'a Gff { self.gff }
  /// Индекс поля в хранилище
  #[inline]
  pub fn index(&self) -> FieldIndex { self.index }
  /// Метка поля
  #[inline]
  pub fn label(&self) -> Label { self.data().label }
  /// Тип поля
  #[inline]
  pub fn field_type(&self) -> FieldType { self.data().field_type }
  /// Значение поля. Значение всегда соответствует типу поля
  #[inline]
  pub fn value(&self) -> &'a Value { &self.data().value }
  /// Структура, в которую входит поле, или `None`, если поле не привязано к дереву
  #[inline]
  pub fn parent(&self) -> Option<StructRef<'a>> {
    self.data().parent.map(|index| StructRef::new(self.gff, index))
  }
  /// Если поле имеет тип `cexolocstr`, возвращает его строки
  #[inline]
  pub fn loc_string(&self) -> Option<&'a LocString> {
    match self.value() {
      Value::LocString(map) => Some(map),
      _ => None,
    }
  }
  /// Перечисляет структуры, являющиеся значением поля: одну структуру для поля типа `struct`,
  /// все элементы списка для поля типа `list` и ни одной для остальных типов
  pub fn structs(&self) -> impl Iterator<Item = StructRef<'a>> + 'a {
    let gff = self.gff;
    self.value().structs().iter().map(move |index| StructRef::new(gff, *index))
  }
  /// Проверяет, что значение поля соответствует его типу
  #[inline]
  pub fn is_valid(&self) -> bool {
    valid_for(self.value(), self.field_type(), &self.gff.settings)
  }
  /// Проверяет, что значение поля соответствует его типу, и возвращает ошибку в противном случае
  pub fn validate(&self) -> Result<()> {
    if self.is_valid() {
      return Ok(());
    }
    Err(Error::InvalidFieldValue { label: self.label(), field_type: self.field_type() })
  }
  /// Возвращает полный путь к полю, включающий все родительские структуры, например,
  /// `UTI/PropertiesList[0]/CostTable`.
  ///
  /// # Ошибки
  /// [`Error::UnboundField`], если поле или одна из его родительских структур не привязаны
  /// к корню дерева
  ///
  /// [`Error::UnboundField`]: ../error/enum.Error.html#variant.UnboundField
  #[inline]
  pub fn path(&self) -> Result<String> {
    self.gff.field_path(self.index)
  }
  /// Перечисляет само поле и все вложенные в него элементы вместе с их путями относительно
  /// пути поля
  #[inline]
  pub fn flatten(&self) -> Flatten<'a> {
    Flatten::field(self.gff, self.index)
  }
}

impl<'a> fmt::Debug for FieldRef<'a> {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.debug_struct("Field")
      .field("index", &self.index)
      .field("label", &self.label())
      .field("type", &self.field_type())
      .field("value", self.value())
      .finish()
  }
}

/// Структура GFF дерева, доступная для чтения
#[derive(Clone, Copy)]
pub struct StructRef<'a> {
  gff: &'a Gff,
  index: StructIndex,
}

impl<'a> StructRef<'a> {
  #[inline]
  pub(crate) fn new(gff: &'a Gff, index: StructIndex) -> Self {
    StructRef { gff, index }
  }
  #[inline]
  fn data(&self) -> &'a StructData {
    &self.gff.structs[self.index.get()]
  }
  /// Индекс структуры в хранилище
  #[inline]
  pub fn index(&self) -> StructIndex { self.index }
  /// Вид файла, задается для корневой структуры
  #[inline]
  pub fn data_type(&self) -> Option<&'a str> { self.data().data_type.as_deref() }
  /// Версия формата файла, задается для корневой структуры
  #[inline]
  pub fn data_version(&self) -> Option<&'a str> { self.data().data_version.as_deref() }
  /// Идентификатор типа структуры
  #[inline]
  pub fn struct_id(&self) -> u32 { self.data().struct_id }
  /// Является ли структура корнем дерева
  #[inline]
  pub fn is_root(&self) -> bool { self.index == self.gff.root }
  /// Поле, значением которого является структура
  #[inline]
  pub fn element(&self) -> Option<FieldRef<'a>> {
    self.data().element.map(|index| FieldRef::new(self.gff, index))
  }
  /// Количество полей структуры
  #[inline]
  pub fn len(&self) -> usize { self.data().fields.len() }
  /// Возвращает `true`, если в структуре нет полей
  #[inline]
  pub fn is_empty(&self) -> bool { self.data().fields.is_empty() }
  /// Ищет поле структуры по метке
  pub fn get(&self, label: &str) -> Option<FieldRef<'a>> {
    let label: Label = label.parse().ok()?;
    self.data().fields.get(&label).map(|index| FieldRef::new(self.gff, *index))
  }
  /// Перечисляет поля структуры в порядке их добавления
  pub fn fields(&self) -> impl Iterator<Item = FieldRef<'a>> + 'a {
    let gff = self.gff;
    self.data().fields.values().map(move |index| FieldRef::new(gff, *index))
  }
  /// Возвращает путь к структуре: путь поля, значением которого она является, и вид файла.
  /// Путь корневой структуры состоит только из вида файла.
  ///
  /// # Ошибки
  /// [`Error::UnboundField`], если структура не привязана к корню дерева
  ///
  /// [`Error::UnboundField`]: ../error/enum.Error.html#variant.UnboundField
  #[inline]
  pub fn path(&self) -> Result<String> {
    self.gff.struct_path(self.index)
  }
  /// Перечисляет в глубину все поля структуры и вложенные в них элементы вместе с их путями
  /// относительно пути структуры
  #[inline]
  pub fn flatten(&self) -> Flatten<'a> {
    Flatten::fields(self.gff, self.index)
  }
}

impl<'a> fmt::Debug for StructRef<'a> {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.debug_struct("Struct")
      .field("index", &self.index)
      .field("struct_id", &self.struct_id())
      .field("data_type", &self.data_type())
      .field("fields", &self.data().fields)
      .finish()
  }
}
