//! Содержит реализацию типажа `Serialize` для представлений GFF дерева. Позволяет выгрузить
//! дерево в любой формат, поддерживаемый serde, не обращаясь к внутреннему устройству хранилища

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::value::Value;
use super::{FieldRef, Gff, StructRef};

/// Значение поля вместе с хранилищем, из которого берутся вложенные структуры
struct ValueRef<'a> {
  gff: &'a Gff,
  value: &'a Value,
}

impl<'a> Serialize for ValueRef<'a> {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where S: Serializer,
  {
    use crate::value::Value::*;

    match *self.value {
      Integer(val)        => serializer.serialize_i64(val),
      Float(val)          => serializer.serialize_f64(val),
      String(ref val)     => serializer.serialize_str(val),
      Bytes(ref val)      => serializer.serialize_bytes(val),
      LocString(ref val)  => val.serialize(serializer),
      Struct(index)       => StructRef::new(self.gff, index).serialize(serializer),
      List(ref items)     => {
        let mut seq = serializer.serialize_seq(Some(items.len()))?;
        for index in items {
          seq.serialize_element(&StructRef::new(self.gff, *index))?;
        }
        seq.end()
      },
    }
  }
}

/// Поле сериализуется как отображение с ключами `type` и `value`
impl<'a> Serialize for FieldRef<'a> {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where S: Serializer,
  {
    let mut map = serializer.serialize_map(Some(2))?;
    map.serialize_entry("type", &self.field_type())?;
    map.serialize_entry("value", &ValueRef { gff: self.gff(), value: self.value() })?;
    map.end()
  }
}

/// Структура сериализуется как отображение, в котором за служебными ключами `__data_type`,
/// `__data_version` (только если они заданы) и `__struct_id` следуют поля структуры в порядке
/// их добавления
impl<'a> Serialize for StructRef<'a> {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where S: Serializer,
  {
    let mut map = serializer.serialize_map(None)?;
    if let Some(data_type) = self.data_type() {
      map.serialize_entry("__data_type", data_type)?;
    }
    if let Some(data_version) = self.data_version() {
      map.serialize_entry("__data_version", data_version)?;
    }
    map.serialize_entry("__struct_id", &self.struct_id())?;
    for field in self.fields() {
      map.serialize_entry(&field.label(), &field)?;
    }
    map.end()
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use crate::gff::Gff;
  use crate::gff::tests::{label, loc};
  use crate::value::{FieldType, Value};

  #[test]
  fn tree_serializes_in_field_order() {
    let mut gff = Gff::new("UTI", "V3.2");
    let root = gff.root();
    gff.add_field(root, label("Tag"), FieldType::String, "ring".into()).unwrap();
    gff.add_field(root, label("Cost"), FieldType::Dword, Value::Integer(150)).unwrap();
    gff.add_field(root, label("LocName"), FieldType::LocString, loc(&[(0, "Ring")])).unwrap();

    let item = gff.new_struct(4);
    gff.add_field(item, label("Data"), FieldType::Void, Value::Bytes(vec![0xde, 0xad])).unwrap();
    gff.add_field(root, label("Props"), FieldType::List, vec![item].into()).unwrap();

    let json = serde_json::to_value(gff.root_struct()).unwrap();
    assert_eq!(json, json!({
      "__data_type": "UTI",
      "__data_version": "V3.2",
      "__struct_id": 0xFFFF_FFFFu32,
      "Tag": { "type": "cexostr", "value": "ring" },
      "Cost": { "type": "dword", "value": 150 },
      "LocName": { "type": "cexolocstr", "value": { "0": "Ring" } },
      "Props": { "type": "list", "value": [
        { "__struct_id": 4, "Data": { "type": "void", "value": [0xde, 0xad] } }
      ] }
    }));

    let text = serde_json::to_string(&gff.root_struct()).unwrap();
    let tag = text.find("\"Tag\"").unwrap();
    let props = text.find("\"Props\"").unwrap();
    assert!(tag < props);
  }

  #[test]
  fn field_serializes_with_type() {
    let mut gff = Gff::new("UTI", "V3.2");
    let field = gff.new_field(label("Weight"), FieldType::Float, Value::Float(0.5)).unwrap();
    let json = serde_json::to_value(gff.field(field)).unwrap();
    assert_eq!(json, json!({ "type": "float", "value": 0.5 }));
  }
}
