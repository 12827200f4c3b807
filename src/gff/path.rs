//! Вычисление путей к полям и структурам GFF дерева

use crate::error::{Error, Result};
use crate::index::{FieldIndex, StructIndex};
use crate::value::Value;
use super::{Gff, Node};

impl Gff {
  /// Путь к полю: путь родительской структуры и метка поля. Если родительская структура
  /// является элементом списка, после пути списка указывается номер элемента: `List[2]/Label`
  pub(crate) fn field_path(&self, index: FieldIndex) -> Result<String> {
    let field = &self.fields[index.get()];
    let parent = field.parent.ok_or_else(|| Error::UnboundField(field.label.to_string()))?;
    let parent_path = self.struct_path(parent)?;

    let owner = self.structs[parent.get()].element.map(|e| &self.fields[e.get()].value);
    if let Some(Value::List(items)) = owner {
      if let Some(i) = items.iter().position(|item| *item == parent) {
        return Ok(format!("{}[{}]/{}", parent_path, i, field.label));
      }
    }
    Ok(format!("{}/{}", parent_path, field.label))
  }
  /// Путь к структуре: путь поля, значением которого она является (или пустая строка для
  /// корня), и вид файла
  pub(crate) fn struct_path(&self, index: StructIndex) -> Result<String> {
    let data = &self.structs[index.get()];
    let mut path = match data.element {
      Some(element) => self.field_path(element)?,
      None if index == self.root => String::new(),
      None => return Err(Error::UnboundField(format!("{:?}", index))),
    };
    if let Some(ref data_type) = data.data_type {
      path.push_str(data_type);
    }
    Ok(path)
  }

  /// Ищет узел дерева по его полному пути, например, `UTI/PropertiesList[0]/CostTable`
  /// или `UTI/LocalizedName/0`. Путь, совпадающий с путем корня, соответствует корню
  pub fn by_path(&self, path: &str) -> Option<Node<'_>> {
    let root = self.root_struct();
    let rest = path.strip_prefix(root.data_type().unwrap_or(""))?;
    if rest.is_empty() {
      return Some(Node::Struct(root));
    }
    root.flatten()
      .find(|(suffix, _)| suffix == rest)
      .map(|(_, node)| node)
  }
}

#[cfg(test)]
mod tests {
  use crate::error::Error;
  use crate::gff::{Gff, Node};
  use crate::gff::tests::{label, loc};
  use crate::value::{FieldType, Value};

  /// Строит дерево:
  /// ```text
  /// UTI
  /// ├─ Tag: "ring"
  /// ├─ Inner (struct)
  /// │  └─ Deeper (struct)
  /// │     └─ Value: 7
  /// └─ Items (list)
  ///    ├─ [0] Name: "first"
  ///    ├─ [1] Name: "second"
  ///    └─ [2] Name: "third", LocName: {0: "Hello"}
  /// ```
  fn tree() -> Gff {
    let mut gff = Gff::new("UTI", "V3.2");
    let root = gff.root();
    gff.add_field(root, label("Tag"), FieldType::String, "ring".into()).unwrap();

    let inner = gff.new_struct(1);
    let deeper = gff.new_struct(2);
    gff.add_field(deeper, label("Value"), FieldType::Int, Value::Integer(7)).unwrap();
    gff.add_field(inner, label("Deeper"), FieldType::Struct, deeper.into()).unwrap();
    gff.add_field(root, label("Inner"), FieldType::Struct, inner.into()).unwrap();

    let mut items = Vec::new();
    for name in &["first", "second", "third"] {
      let item = gff.new_struct(0);
      gff.add_field(item, label("Name"), FieldType::String, (*name).into()).unwrap();
      items.push(item);
    }
    gff.add_field(items[2], label("LocName"), FieldType::LocString, loc(&[(0, "Hello")])).unwrap();
    gff.add_field(root, label("Items"), FieldType::List, items.into()).unwrap();
    gff
  }

  #[test]
  fn root_path_is_data_type() {
    let gff = tree();
    assert_eq!(gff.root_struct().path().unwrap(), "UTI");
    assert_eq!(gff.root_struct().get("Tag").unwrap().path().unwrap(), "UTI/Tag");
  }

  #[test]
  fn nested_struct_path() {
    let gff = tree();
    let inner = gff.root_struct().get("Inner").unwrap();
    let deeper = inner.structs().next().unwrap().get("Deeper").unwrap();
    let value = deeper.structs().next().unwrap().get("Value").unwrap();

    assert_eq!(value.path().unwrap(), "UTI/Inner/Deeper/Value");
    assert_eq!(deeper.structs().next().unwrap().path().unwrap(), "UTI/Inner/Deeper");
  }

  #[test]
  fn list_member_path_has_index() {
    let gff = tree();
    let items = gff.root_struct().get("Items").unwrap();
    let third = items.structs().nth(2).unwrap();

    assert_eq!(third.path().unwrap(), "UTI/Items");
    assert_eq!(third.get("Name").unwrap().path().unwrap(), "UTI/Items[2]/Name");
    assert_eq!(third.get("LocName").unwrap().path().unwrap(), "UTI/Items[2]/LocName");
  }

  #[test]
  fn unbound_field_has_no_path() {
    let mut gff = tree();
    let loose = gff.new_field(label("Loose"), FieldType::Byte, Value::Integer(1)).unwrap();
    match gff.field(loose).path() {
      Err(Error::UnboundField(l)) => assert_eq!(l, "Loose"),
      other => panic!("unexpected result: {:?}", other),
    }

    let orphan = gff.new_struct(5);
    let field = gff.add_field(orphan, label("Orphan"), FieldType::Byte, Value::Integer(1)).unwrap();
    assert!(gff.structure(orphan).path().is_err());
    assert!(gff.field(field).path().is_err());
  }

  #[test]
  fn detached_subtree_loses_path() {
    let mut gff = tree();
    let inner = gff.root_struct().get("Inner").unwrap().index();
    let deeper = gff.root_struct().get("Inner").unwrap()
      .structs().next().unwrap()
      .get("Deeper").unwrap()
      .index();
    gff.detach(inner);
    assert!(gff.field(deeper).path().is_err());
  }

  #[test]
  fn find_by_path() {
    let gff = tree();
    match gff.by_path("UTI/Items[1]/Name") {
      Some(Node::Field(field)) => assert_eq!(field.value(), &Value::String("second".into())),
      other => panic!("unexpected node: {:?}", other),
    }
    match gff.by_path("UTI/Items[2]") {
      Some(Node::Struct(item)) => assert_eq!(item.len(), 2),
      other => panic!("unexpected node: {:?}", other),
    }
    match gff.by_path("UTI/Items[2]/LocName/0") {
      Some(Node::Text { language: 0, text }) => assert_eq!(text, "Hello"),
      other => panic!("unexpected node: {:?}", other),
    }
    match gff.by_path("UTI") {
      Some(Node::Struct(root)) => assert!(root.is_root()),
      other => panic!("unexpected node: {:?}", other),
    }
    assert!(gff.by_path("UTI/Missing").is_none());
    assert!(gff.by_path("UTC/Tag").is_none());
  }
}
