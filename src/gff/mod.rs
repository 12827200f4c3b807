//! Модель GFF дерева в памяти: структуры, поля и их взаимные ссылки.
//!
//! Все структуры и поля одного GFF файла хранятся в общем хранилище [`Gff`] и адресуются
//! индексами [`StructIndex`] и [`FieldIndex`]. Поле хранит индекс структуры, в которую оно
//! входит, а структура -- индекс поля, значением которого она является. Благодаря этому
//! от любого узла можно подняться к корню и вычислить его путь, не создавая циклов владения.
//!
//! Любое изменение значения или типа поля проверяется функцией [`valid_for`]. Если значение
//! не подходит, дерево остается в прежнем состоянии.
//!
//! # Пример
//! ```rust
//! use aurora_gff::gff::Gff;
//! use aurora_gff::value::{FieldType, Value};
//!
//! # fn main() -> aurora_gff::error::Result<()> {
//! let mut gff = Gff::new("UTI", "V3.2");
//! let root = gff.root();
//!
//! let list = gff.add_field(root, "PropertiesList".parse()?, FieldType::List, Value::List(Vec::new()))?;
//! let item = gff.new_struct(0);
//! gff.add_field(item, "CostTable".parse()?, FieldType::Byte, 3u8.into())?;
//! gff.set_value(list, vec![item].into())?;
//!
//! let cost = gff.structure(item).get("CostTable").unwrap();
//! assert_eq!(cost.path()?, "UTI/PropertiesList[0]/CostTable");
//! # Ok(())
//! # }
//! ```
//!
//! [`Gff`]: struct.Gff.html
//! [`StructIndex`]: ../index/struct.StructIndex.html
//! [`FieldIndex`]: ../index/struct.FieldIndex.html
//! [`valid_for`]: ../value/fn.valid_for.html

use std::collections::HashSet;
use std::mem;
use indexmap::IndexMap;

use crate::Label;
use crate::error::{Error, Result};
use crate::index::{FieldIndex, StructIndex};
use crate::settings::Settings;
use crate::value::{valid_for, FieldType, Value};

mod flatten;
mod path;
mod ser;
mod view;

pub use self::flatten::{Flatten, Node};
pub use self::view::{FieldRef, StructRef};

/// Идентификатор типа, записываемый в корневую структуру GFF файла
pub const ROOT_STRUCT_ID: u32 = 0xFFFF_FFFF;

/// Данные одной структуры GFF дерева
#[derive(Debug, Clone)]
pub(crate) struct StructData {
  /// Вид файла, для корневой структуры. Обычно совпадает с расширением файла
  pub data_type: Option<String>,
  /// Версия формата файла, для корневой структуры
  pub data_version: Option<String>,
  /// Идентификатор типа структуры
  pub struct_id: u32,
  /// Поле, значением которого (или элементом значения которого) является структура
  pub element: Option<FieldIndex>,
  /// Поля структуры в порядке их добавления
  pub fields: IndexMap<Label, FieldIndex>,
}

/// Данные одного поля GFF дерева
#[derive(Debug, Clone)]
pub(crate) struct FieldData {
  pub label: Label,
  pub field_type: FieldType,
  pub value: Value,
  /// Структура, в которую входит поле
  pub parent: Option<StructIndex>,
}

/// Хранилище всех структур и полей одного GFF дерева. Хранилище всегда содержит корневую
/// структуру, остальные структуры и поля создаются читателем GFF файла снизу вверх и затем
/// связываются между собой.
///
/// Индексы, выданные одним хранилищем, нельзя использовать с другим: методы, принимающие
/// чужой индекс, могут запаниковать.
#[derive(Debug, Clone)]
pub struct Gff {
  /// Настройки, с которыми проверяются значения полей
  settings: Settings,
  /// Корневая структура дерева
  root: StructIndex,
  structs: Vec<StructData>,
  fields: Vec<FieldData>,
}

impl Gff {
  /// Создает дерево с пустой корневой структурой указанного вида и версии и настройками
  /// проверки значений по умолчанию
  #[inline]
  pub fn new(data_type: &str, data_version: &str) -> Self {
    Self::with_settings(data_type, data_version, Settings::default())
  }
  /// Создает дерево с пустой корневой структурой указанного вида и версии, значения полей
  /// которого будут проверяться с указанными настройками
  pub fn with_settings(data_type: &str, data_version: &str, settings: Settings) -> Self {
    let root = StructData {
      data_type: Some(data_type.to_owned()),
      data_version: Some(data_version.to_owned()),
      struct_id: ROOT_STRUCT_ID,
      element: None,
      fields: IndexMap::new(),
    };
    Gff { settings, root: StructIndex(0), structs: vec![root], fields: Vec::new() }
  }
  /// Настройки, с которыми проверяются значения полей
  #[inline]
  pub fn settings(&self) -> &Settings { &self.settings }
  /// Индекс корневой структуры
  #[inline]
  pub fn root(&self) -> StructIndex { self.root }
  /// Количество структур в хранилище, включая корневую и не привязанные к дереву
  #[inline]
  pub fn struct_count(&self) -> usize { self.structs.len() }
  /// Количество полей в хранилище, включая не привязанные к дереву
  #[inline]
  pub fn field_count(&self) -> usize { self.fields.len() }

  /// Возвращает представление поля для чтения
  ///
  /// # Паника
  /// Если индекс выдан другим хранилищем и выходит за его пределы
  #[inline]
  pub fn field(&self, index: FieldIndex) -> FieldRef<'_> {
    assert!(index.get() < self.fields.len(), "{:?} does not belong to this tree", index);
    FieldRef::new(self, index)
  }
  /// Возвращает представление структуры для чтения
  ///
  /// # Паника
  /// Если индекс выдан другим хранилищем и выходит за его пределы
  #[inline]
  pub fn structure(&self, index: StructIndex) -> StructRef<'_> {
    assert!(index.get() < self.structs.len(), "{:?} does not belong to this tree", index);
    StructRef::new(self, index)
  }
  /// Возвращает представление корневой структуры
  #[inline]
  pub fn root_struct(&self) -> StructRef<'_> { self.structure(self.root) }

//-------------------------------------------------------------------------------------------------
// Создание элементов
//-------------------------------------------------------------------------------------------------
  /// Создает новую вложенную структуру без полей с указанным идентификатором типа. Структура
  /// не привязана к дереву, пока не станет значением поля типа `struct` или `list`
  pub fn new_struct(&mut self, struct_id: u32) -> StructIndex {
    let index = StructIndex(self.structs.len() as u32);
    self.structs.push(StructData {
      data_type: None,
      data_version: None,
      struct_id,
      element: None,
      fields: IndexMap::new(),
    });
    index
  }
  /// Создает новое поле, не привязанное ни к одной структуре.
  ///
  /// Если значением поля является структура или список структур, они становятся
  /// принадлежащими этому полю.
  ///
  /// # Ошибки
  /// [`Error::InvalidFieldValue`], если значение не подходит для указанного типа, или
  /// если оно ссылается на корневую структуру, на несуществующие структуры или на структуры,
  /// уже принадлежащие другим полям
  ///
  /// [`Error::InvalidFieldValue`]: ../error/enum.Error.html#variant.InvalidFieldValue
  pub fn new_field(&mut self, label: Label, field_type: FieldType, value: Value) -> Result<FieldIndex> {
    let index = FieldIndex(self.fields.len() as u32);
    if !self.accepts(index, None, field_type, &value) {
      return Err(Error::InvalidFieldValue { label, field_type });
    }
    self.adopt(index, &value);
    self.fields.push(FieldData { label, field_type, value, parent: None });
    Ok(index)
  }
  /// Создает новое поле и сразу же добавляет его в конец указанной структуры. Если в
  /// структуре уже было поле с такой меткой, оно заменяется новым полем и отвязывается
  /// от структуры.
  ///
  /// # Ошибки
  /// Аналогичны ошибкам [`new_field`](#method.new_field). В случае ошибки поле не создается
  pub fn add_field(&mut self, parent: StructIndex, label: Label, field_type: FieldType, value: Value) -> Result<FieldIndex> {
    let index = FieldIndex(self.fields.len() as u32);
    if !self.accepts(index, Some(parent), field_type, &value) {
      return Err(Error::InvalidFieldValue { label, field_type });
    }
    let index = self.new_field(label, field_type, value)?;
    self.attach(parent, index)?;
    Ok(index)
  }

//-------------------------------------------------------------------------------------------------
// Связывание элементов
//-------------------------------------------------------------------------------------------------
  /// Добавляет поле в конец структуры, отвязывая его от прежней структуры, если она была.
  /// Если в структуре уже есть другое поле с такой же меткой, новое поле занимает его
  /// место, а прежнее поле отвязывается и возвращается.
  ///
  /// # Ошибки
  /// [`Error::InvalidFieldValue`], если значением поля является структура, содержащая
  /// `parent` -- такая привязка создала бы цикл
  ///
  /// [`Error::InvalidFieldValue`]: ../error/enum.Error.html#variant.InvalidFieldValue
  pub fn attach(&mut self, parent: StructIndex, field: FieldIndex) -> Result<Option<FieldIndex>> {
    let data = &self.fields[field.get()];
    if self.is_ancestor_of(Some(parent), data.value.structs()) {
      return Err(Error::InvalidFieldValue { label: data.label, field_type: data.field_type });
    }
    self.detach(field);

    let label = self.fields[field.get()].label;
    let replaced = self.structs[parent.get()].fields.insert(label, field);
    if let Some(old) = replaced {
      self.fields[old.get()].parent = None;
    }
    self.fields[field.get()].parent = Some(parent);
    Ok(replaced)
  }
  /// Удаляет поле из структуры, в которую оно входит. Поле остается в хранилище и может
  /// быть снова привязано к любой структуре. Возвращает структуру, из которой было удалено поле
  pub fn detach(&mut self, field: FieldIndex) -> Option<StructIndex> {
    let data = &mut self.fields[field.get()];
    let parent = data.parent.take()?;
    let fields = &mut self.structs[parent.get()].fields;
    if fields.get(&data.label) == Some(&field) {
      fields.shift_remove(&data.label);
    }
    Some(parent)
  }

//-------------------------------------------------------------------------------------------------
// Изменение полей
//-------------------------------------------------------------------------------------------------
  /// Заменяет значение поля, проверив его на соответствие текущему типу поля. Структуры,
  /// на которые ссылалось прежнее значение, отвязываются от дерева.
  ///
  /// # Ошибки
  /// [`Error::InvalidFieldValue`] по тем же причинам, что и при создании поля. В этом случае
  /// поле не меняется
  ///
  /// [`Error::InvalidFieldValue`]: ../error/enum.Error.html#variant.InvalidFieldValue
  #[inline]
  pub fn set_value(&mut self, field: FieldIndex, value: Value) -> Result<()> {
    let field_type = self.fields[field.get()].field_type;
    self.set(field, field_type, value)
  }
  /// Меняет тип поля, проверив текущее значение на соответствие новому типу.
  ///
  /// # Ошибки
  /// [`Error::InvalidFieldValue`], если текущее значение не подходит для нового типа. В этом
  /// случае поле не меняется
  ///
  /// [`Error::InvalidFieldValue`]: ../error/enum.Error.html#variant.InvalidFieldValue
  pub fn set_type(&mut self, field: FieldIndex, field_type: FieldType) -> Result<()> {
    let data = &self.fields[field.get()];
    if !valid_for(&data.value, field_type, &self.settings) {
      return Err(Error::InvalidFieldValue { label: data.label, field_type });
    }
    self.fields[field.get()].field_type = field_type;
    Ok(())
  }
  /// Одновременно меняет тип и значение поля. Изменение выполняется, только если значение
  /// подходит для нового типа
  pub fn set(&mut self, field: FieldIndex, field_type: FieldType, value: Value) -> Result<()> {
    let data = &self.fields[field.get()];
    if !self.accepts(field, data.parent, field_type, &value) {
      return Err(Error::InvalidFieldValue { label: data.label, field_type });
    }
    let old = mem::replace(&mut self.fields[field.get()].value, Value::Integer(0));
    self.release(&old);
    self.adopt(field, &value);

    let data = &mut self.fields[field.get()];
    data.field_type = field_type;
    data.value = value;
    Ok(())
  }
  /// Меняет метку поля, сохраняя его позицию в структуре.
  ///
  /// # Ошибки
  /// [`Error::DuplicateLabel`], если структура, в которую входит поле, уже содержит другое
  /// поле с такой меткой
  ///
  /// [`Error::DuplicateLabel`]: ../error/enum.Error.html#variant.DuplicateLabel
  pub fn set_label(&mut self, field: FieldIndex, label: Label) -> Result<()> {
    let data = &self.fields[field.get()];
    if let Some(parent) = data.parent {
      let fields = &mut self.structs[parent.get()].fields;
      match fields.get(&label) {
        Some(other) if *other != field => return Err(Error::DuplicateLabel(label)),
        _ => {},
      }
      *fields = mem::take(fields).into_iter()
        .map(|(l, f)| if f == field { (label, f) } else { (l, f) })
        .collect();
    }
    self.fields[field.get()].label = label;
    Ok(())
  }

//-------------------------------------------------------------------------------------------------
// Изменение структур
//-------------------------------------------------------------------------------------------------
  /// Устанавливает вид файла, описываемого структурой (обычно задается только для корня)
  pub fn set_data_type(&mut self, index: StructIndex, data_type: Option<String>) {
    self.structs[index.get()].data_type = data_type;
  }
  /// Устанавливает версию формата файла, описываемого структурой (обычно задается только для корня)
  pub fn set_data_version(&mut self, index: StructIndex, data_version: Option<String>) {
    self.structs[index.get()].data_version = data_version;
  }
  /// Устанавливает идентификатор типа структуры
  pub fn set_struct_id(&mut self, index: StructIndex, struct_id: u32) {
    self.structs[index.get()].struct_id = struct_id;
  }

//-------------------------------------------------------------------------------------------------
// Вспомогательные методы
//-------------------------------------------------------------------------------------------------
  /// Проверяет, может ли поле `owner`, входящее в структуру `parent`, иметь указанные тип
  /// и значение
  fn accepts(&self, owner: FieldIndex, parent: Option<StructIndex>, field_type: FieldType, value: &Value) -> bool {
    if !valid_for(value, field_type, &self.settings) {
      return false;
    }
    let items = value.structs();
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
      if item.get() >= self.structs.len() || *item == self.root || !seen.insert(*item) {
        return false;
      }
      match self.structs[item.get()].element {
        Some(element) if element != owner => return false,
        _ => {},
      }
    }
    !self.is_ancestor_of(parent, items)
  }
  /// Определяет, встречается ли одна из структур `items` на пути от `start` к корню
  fn is_ancestor_of(&self, start: Option<StructIndex>, items: &[StructIndex]) -> bool {
    let mut current = start;
    while let Some(index) = current {
      if items.contains(&index) {
        return true;
      }
      current = self.structs[index.get()].element
        .and_then(|element| self.fields[element.get()].parent);
    }
    false
  }
  /// Делает поле владельцем всех структур из значения
  #[inline]
  fn adopt(&mut self, owner: FieldIndex, value: &Value) {
    for item in value.structs() {
      self.structs[item.get()].element = Some(owner);
    }
  }
  /// Отвязывает от дерева все структуры из значения
  #[inline]
  fn release(&mut self, value: &Value) {
    for item in value.structs() {
      self.structs[item.get()].element = None;
    }
  }
}
