//! Модель данных файлов формата Bioware GFF и чтение таблиц локализованных строк (TLK),
//! используемых в играх на движке Aurora (Neverwinter Nights, The Witcher) и в игре
//! Neverwinter Nights 2.
//!
//! GFF дерево строится в хранилище [`Gff`], которое следит за тем, чтобы значения полей
//! соответствовали их типам, а структуры не образовывали циклов. Таблицы строк читаются
//! с помощью [`TalkTable`] и [`TalkTableSet`].
//!
//! [`Gff`]: gff/struct.Gff.html
//! [`TalkTable`]: tlk/struct.TalkTable.html
//! [`TalkTableSet`]: tlk/struct.TalkTableSet.html
#![warn(missing_docs)]

// Модули, чье содержимое реэкспортируется, разделено для удобства сопровождения
mod label;
mod string;

pub mod error;
pub mod settings;
pub mod index;
pub mod value;
pub mod gff;
pub mod tlk;

pub use label::*;
pub use string::*;
