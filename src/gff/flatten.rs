//! Обход GFF дерева в глубину с вычислением относительных путей узлов

use std::iter::FusedIterator;

use crate::index::{FieldIndex, StructIndex};
use crate::value::Value;
use super::{FieldRef, Gff, StructRef};

/// Узел GFF дерева, встреченный при обходе
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
  /// Поле структуры
  Field(FieldRef<'a>),
  /// Структура -- элемент списка
  Struct(StructRef<'a>),
  /// Текст локализуемой строки на одном языке
  Text {
    /// Идентификатор языка
    language: u32,
    /// Текст строки
    text: &'a str,
  },
}

/// Отложенный шаг обхода
#[derive(Debug)]
enum Step<'a> {
  /// Выдать поле и запланировать обход его содержимого
  Field(String, FieldIndex),
  /// Запланировать обход всех полей структуры
  Fields(String, StructIndex),
  /// Выдать элемент списка и запланировать обход его полей
  Item(String, StructIndex),
  /// Выдать текст локализуемой строки
  Text(String, u32, &'a str),
}

/// Ленивый итератор, перечисляющий узлы дерева в глубину вместе с их путями относительно
/// узла, с которого начат обход. Дописав относительный путь к пути начального узла,
/// можно получить полный путь к узлу.
///
/// Порядок перечисления:
/// - поле выдается с путем `/Label` (или пустым путем, если обход начат с самого поля);
/// - следом за полем типа `cexolocstr` идут его строки с путями `/<язык>` по возрастанию языка;
/// - следом за полем типа `struct` идут поля вложенной структуры;
/// - следом за полем типа `list` идут его элементы с путями `[<номер>]`, каждый из которых
///   сразу же сопровождается своими полями с путями `[<номер>]/Label`.
///
/// Итератор нельзя перезапустить: для повторного обхода нужно создать новый
pub struct Flatten<'a> {
  gff: &'a Gff,
  /// Шаги, которые осталось выполнить, в обратном порядке
  stack: Vec<Step<'a>>,
}

impl<'a> Flatten<'a> {
  /// Обход, начинающийся с самого поля
  pub(crate) fn field(gff: &'a Gff, index: FieldIndex) -> Self {
    Flatten { gff, stack: vec![Step::Field(String::new(), index)] }
  }
  /// Обход всех полей структуры, без самой структуры
  pub(crate) fn fields(gff: &'a Gff, index: StructIndex) -> Self {
    Flatten { gff, stack: vec![Step::Fields(String::new(), index)] }
  }
}

impl<'a> Iterator for Flatten<'a> {
  type Item = (String, Node<'a>);

  fn next(&mut self) -> Option<Self::Item> {
    let gff = self.gff;
    while let Some(step) = self.stack.pop() {
      match step {
        Step::Field(path, index) => {
          match gff.fields[index.get()].value {
            Value::LocString(ref strings) => {
              for (language, text) in strings.iter().rev() {
                self.stack.push(Step::Text(format!("{}/{}", path, language), *language, text));
              }
            },
            Value::Struct(item) => self.stack.push(Step::Fields(path.clone(), item)),
            Value::List(ref items) => {
              for (i, item) in items.iter().enumerate().rev() {
                self.stack.push(Step::Item(format!("{}[{}]", path, i), *item));
              }
            },
            _ => {},
          }
          return Some((path, Node::Field(FieldRef::new(gff, index))));
        },
        Step::Fields(path, index) => {
          for (label, field) in gff.structs[index.get()].fields.iter().rev() {
            self.stack.push(Step::Field(format!("{}/{}", path, label), *field));
          }
        },
        Step::Item(path, index) => {
          self.stack.push(Step::Fields(path.clone(), index));
          return Some((path, Node::Struct(StructRef::new(gff, index))));
        },
        Step::Text(path, language, text) => {
          return Some((path, Node::Text { language, text }));
        },
      }
    }
    None
  }
}

impl<'a> FusedIterator for Flatten<'a> {}

#[cfg(test)]
mod tests {
  use super::Node;
  use crate::gff::Gff;
  use crate::gff::tests::{label, loc};
  use crate::value::{FieldType, Value};

  /// Описывает узел коротким текстом для сравнения в тестах
  fn describe(node: &Node) -> String {
    match node {
      Node::Field(field) => format!("field {}", field.label()),
      Node::Struct(item) => format!("struct {}", item.struct_id()),
      Node::Text { language, text } => format!("text {}={}", language, text),
    }
  }

  fn collect<'a, I: Iterator<Item = (String, Node<'a>)>>(iter: I) -> Vec<(String, String)> {
    iter.map(|(path, node)| (path, describe(&node))).collect()
  }

  fn pairs(expected: &[(&str, &str)]) -> Vec<(String, String)> {
    expected.iter().map(|(p, n)| (p.to_string(), n.to_string())).collect()
  }

  #[test]
  fn loc_string_entries_follow_field_in_language_order() {
    let mut gff = Gff::new("UTI", "V3.2");
    let root = gff.root();
    gff.add_field(root, label("LocName"), FieldType::LocString, loc(&[(1, "Bonjour"), (0, "Hello")])).unwrap();

    assert_eq!(collect(gff.root_struct().flatten()), pairs(&[
      ("/LocName",   "field LocName"),
      ("/LocName/0", "text 0=Hello"),
      ("/LocName/1", "text 1=Bonjour"),
    ]));
  }

  #[test]
  fn scalar_field_yields_only_itself() {
    let mut gff = Gff::new("UTI", "V3.2");
    let field = gff.new_field(label("Cost"), FieldType::Dword, Value::Integer(10)).unwrap();
    assert_eq!(collect(gff.field(field).flatten()), pairs(&[("", "field Cost")]));
  }

  #[test]
  fn nested_structs_and_lists() {
    let mut gff = Gff::new("UTI", "V3.2");
    let root = gff.root();
    gff.add_field(root, label("Tag"), FieldType::String, "ring".into()).unwrap();

    let inner = gff.new_struct(9);
    gff.add_field(inner, label("X"), FieldType::Byte, Value::Integer(1)).unwrap();
    gff.add_field(root, label("Inner"), FieldType::Struct, inner.into()).unwrap();

    let a = gff.new_struct(0);
    let b = gff.new_struct(1);
    gff.add_field(a, label("Name"), FieldType::String, "a".into()).unwrap();
    gff.add_field(b, label("Name"), FieldType::String, "b".into()).unwrap();
    gff.add_field(b, label("Desc"), FieldType::LocString, loc(&[(2, "Text")])).unwrap();
    let list = gff.add_field(root, label("Items"), FieldType::List, vec![a, b].into()).unwrap();

    assert_eq!(collect(gff.root_struct().flatten()), pairs(&[
      ("/Tag",             "field Tag"),
      ("/Inner",           "field Inner"),
      ("/Inner/X",         "field X"),
      ("/Items",           "field Items"),
      ("/Items[0]",        "struct 0"),
      ("/Items[0]/Name",   "field Name"),
      ("/Items[1]",        "struct 1"),
      ("/Items[1]/Name",   "field Name"),
      ("/Items[1]/Desc",   "field Desc"),
      ("/Items[1]/Desc/2", "text 2=Text"),
    ]));

    // Обход, начатый с поля, дает пути относительно этого поля
    assert_eq!(collect(gff.field(list).flatten()), pairs(&[
      ("",               "field Items"),
      ("[0]",            "struct 0"),
      ("[0]/Name",       "field Name"),
      ("[1]",            "struct 1"),
      ("[1]/Name",       "field Name"),
      ("[1]/Desc",       "field Desc"),
      ("[1]/Desc/2",     "text 2=Text"),
    ]));
  }

  #[test]
  fn relative_paths_complete_full_paths() {
    let mut gff = Gff::new("UTI", "V3.2");
    let root = gff.root();
    let item = gff.new_struct(0);
    gff.add_field(item, label("Name"), FieldType::String, "a".into()).unwrap();
    gff.add_field(root, label("Items"), FieldType::List, vec![item].into()).unwrap();

    let prefix = gff.root_struct().path().unwrap();
    for (suffix, node) in gff.root_struct().flatten() {
      if let Node::Field(field) = node {
        assert_eq!(format!("{}{}", prefix, suffix), field.path().unwrap());
      }
    }
  }

  #[test]
  fn exhausted_iterator_stays_empty() {
    let mut gff = Gff::new("UTI", "V3.2");
    let root = gff.root();
    gff.add_field(root, label("Tag"), FieldType::String, "ring".into()).unwrap();

    let mut iter = gff.root_struct().flatten();
    assert!(iter.next().is_some());
    assert!(iter.next().is_none());
    assert!(iter.next().is_none());
  }
}
