//! Header normalization
//!
//! Source files come with localized, accented or differently-cased column
//! names. Every header is folded to a plain form and mapped onto one of the
//! canonical fields before any row is read.

use deunicode::deunicode;

use crate::core::record::Field;

/// Header synonyms, already in normalized form
const SYNONYMS: &[(&str, Field)] = &[
    ("employee", Field::Employee),
    ("colaborador", Field::Employee),
    ("funcionario", Field::Employee),
    ("nome", Field::Employee),
    ("course", Field::Course),
    ("curso", Field::Course),
    ("treinamento", Field::Course),
    ("completion date", Field::CompletionDate),
    ("data de conclusao", Field::CompletionDate),
    ("dados de conclusao", Field::CompletionDate),
    ("data conclusao", Field::CompletionDate),
];

/// Name of the identifier column
pub const ID_COLUMN: &str = "id";

/// A recognized column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Id,
    Field(Field),
}

/// Fold a raw header: trim, lower-case, strip diacritics, and collapse runs
/// of whitespace, `_` and `-` into single spaces
pub fn normalize_header(raw: &str) -> String {
    let folded = deunicode(raw.trim()).to_lowercase();
    folded
        .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Map a raw header to the column it stands for, if any
pub fn canonical_column(raw: &str) -> Option<Column> {
    let normalized = normalize_header(raw);
    if normalized == ID_COLUMN {
        return Some(Column::Id);
    }
    SYNONYMS
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|(_, field)| Column::Field(*field))
}

/// Positions of the recognized columns within a header row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    pub id: Option<usize>,
    pub employee: Option<usize>,
    pub course: Option<usize>,
    pub completion_date: Option<usize>,
    /// Headers that matched nothing and are dropped
    pub ignored: Vec<String>,
}

impl HeaderMap {
    /// Build from a header row; the first occurrence of a column wins
    pub fn from_headers<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = HeaderMap::default();
        for (idx, header) in headers.into_iter().enumerate() {
            let header = header.as_ref();
            let slot = match canonical_column(header) {
                Some(Column::Id) => &mut map.id,
                Some(Column::Field(Field::Employee)) => &mut map.employee,
                Some(Column::Field(Field::Course)) => &mut map.course,
                Some(Column::Field(Field::CompletionDate)) => &mut map.completion_date,
                None => {
                    if !header.trim().is_empty() {
                        map.ignored.push(header.to_string());
                    }
                    continue;
                }
            };
            if slot.is_none() {
                *slot = Some(idx);
            }
        }
        map
    }

    /// Position of a canonical field
    pub fn position(&self, field: Field) -> Option<usize> {
        match field {
            Field::Employee => self.employee,
            Field::Course => self.course,
            Field::CompletionDate => self.completion_date,
        }
    }

    /// Canonical fields absent from the source
    pub fn missing(&self) -> Vec<Field> {
        Field::all()
            .iter()
            .copied()
            .filter(|f| self.position(*f).is_none())
            .collect()
    }
}
