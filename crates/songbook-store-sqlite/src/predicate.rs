//! Parameterized `WHERE … LIMIT … OFFSET …` clauses for song listings.
//!
//! A [`Predicate`] is an ordered list of `(column, operator, value)` terms plus
//! a page. Rendering numbers the placeholders (`?1`, `?2`, …) in emission
//! order, so the clause text and the bound values can never drift apart.

use rusqlite::types::Value;
use songbook_core::query::{Page, SongFilter};

use crate::encode::encode_date;

pub const GROUP_COLUMN: &str = "s.group_name";
pub const SONG_COLUMN: &str = "s.song_name";
pub const RELEASED_COLUMN: &str = "d.released_at";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
  Eq,
  Ge,
  Le,
}

impl Op {
  fn as_sql(self) -> &'static str {
    match self {
      Op::Eq => "=",
      Op::Ge => ">=",
      Op::Le => "<=",
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Term {
  pub column: &'static str,
  pub op:     Op,
  pub value:  Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
  terms: Vec<Term>,
  page:  Page,
}

/// Clause text and its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
  pub sql:    String,
  pub params: Vec<Value>,
}

impl Predicate {
  /// Build the listing predicate. Terms always appear in the order group,
  /// song, released-after, released-before.
  pub fn for_listing(filter: &SongFilter, page: Page) -> Self {
    let mut terms = Vec::with_capacity(4);

    if let Some(group) = &filter.group {
      terms.push(Term { column: GROUP_COLUMN, op: Op::Eq, value: Value::Text(group.clone()) });
    }
    if let Some(song) = &filter.song {
      terms.push(Term { column: SONG_COLUMN, op: Op::Eq, value: Value::Text(song.clone()) });
    }
    if let Some(after) = filter.released_after {
      terms.push(Term {
        column: RELEASED_COLUMN,
        op:     Op::Ge,
        value:  Value::Text(encode_date(after)),
      });
    }
    if let Some(before) = filter.released_before {
      terms.push(Term {
        column: RELEASED_COLUMN,
        op:     Op::Le,
        value:  Value::Text(encode_date(before)),
      });
    }

    Self { terms, page }
  }

  pub fn terms(&self) -> &[Term] { &self.terms }

  pub fn render(&self) -> Rendered {
    let mut sql = String::new();
    let mut params = Vec::with_capacity(self.terms.len() + 2);

    for (i, term) in self.terms.iter().enumerate() {
      sql.push_str(if i == 0 { "WHERE " } else { " AND " });
      params.push(term.value.clone());
      sql.push_str(&format!("{} {} ?{}", term.column, term.op.as_sql(), params.len()));
    }
    if !sql.is_empty() {
      sql.push(' ');
    }

    params.push(Value::Integer(i64::from(self.page.limit)));
    let limit_idx = params.len();
    params.push(Value::Integer(i64::from(self.page.offset)));
    let offset_idx = params.len();
    sql.push_str(&format!("LIMIT ?{limit_idx} OFFSET ?{offset_idx}"));

    Rendered { sql, params }
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  fn full_filter() -> SongFilter {
    SongFilter {
      group:           Some("Coldplay".into()),
      song:            Some("Yellow".into()),
      released_after:  Some(date(2000, 1, 1)),
      released_before: Some(date(2001, 12, 31)),
    }
  }

  #[test]
  fn empty_filter_renders_only_paging() {
    let r = Predicate::for_listing(&SongFilter::default(), Page::new(10, 20)).render();
    assert_eq!(r.sql, "LIMIT ?1 OFFSET ?2");
    assert_eq!(r.params, vec![Value::Integer(10), Value::Integer(20)]);
    assert!(!r.sql.contains("WHERE"));
    assert!(!r.sql.contains("AND"));
  }

  #[test]
  fn full_filter_renders_in_fixed_order() {
    let r = Predicate::for_listing(&full_filter(), Page::new(5, 0)).render();
    assert_eq!(
      r.sql,
      "WHERE s.group_name = ?1 AND s.song_name = ?2 \
       AND d.released_at >= ?3 AND d.released_at <= ?4 LIMIT ?5 OFFSET ?6"
    );
    assert_eq!(r.params, vec![
      Value::Text("Coldplay".into()),
      Value::Text("Yellow".into()),
      Value::Text("2000-01-01".into()),
      Value::Text("2001-12-31".into()),
      Value::Integer(5),
      Value::Integer(0),
    ]);
  }

  #[test]
  fn single_date_bound_is_first_placeholder() {
    let filter = SongFilter { released_before: Some(date(1999, 3, 4)), ..Default::default() };
    let r = Predicate::for_listing(&filter, Page::new(1, 2)).render();
    assert_eq!(r.sql, "WHERE d.released_at <= ?1 LIMIT ?2 OFFSET ?3");
    assert_eq!(r.params[0], Value::Text("1999-03-04".into()));
  }

  #[test]
  fn every_subset_has_k_terms_and_k_plus_two_params() {
    let full = full_filter();
    for mask in 0u8..16 {
      let filter = SongFilter {
        group:           (mask & 1 != 0).then(|| full.group.clone().unwrap()),
        song:            (mask & 2 != 0).then(|| full.song.clone().unwrap()),
        released_after:  (mask & 4 != 0).then_some(full.released_after.unwrap()),
        released_before: (mask & 8 != 0).then_some(full.released_before.unwrap()),
      };
      let k = mask.count_ones() as usize;

      let predicate = Predicate::for_listing(&filter, Page::new(3, 4));
      let r = predicate.render();

      assert_eq!(predicate.terms().len(), k, "mask {mask:#06b}");
      assert_eq!(r.sql.matches(" AND ").count(), k.saturating_sub(1), "mask {mask:#06b}");
      assert_eq!(r.params.len(), k + 2, "mask {mask:#06b}");
      assert_eq!(r.sql.starts_with("WHERE "), k > 0, "mask {mask:#06b}");
      assert!(
        r.sql.ends_with(&format!("LIMIT ?{} OFFSET ?{}", k + 1, k + 2)),
        "mask {mask:#06b}: {}",
        r.sql
      );

      let columns: Vec<_> = predicate.terms().iter().map(|t| (t.column, t.op)).collect();
      let expected: Vec<_> = [
        (mask & 1 != 0, (GROUP_COLUMN, Op::Eq)),
        (mask & 2 != 0, (SONG_COLUMN, Op::Eq)),
        (mask & 4 != 0, (RELEASED_COLUMN, Op::Ge)),
        (mask & 8 != 0, (RELEASED_COLUMN, Op::Le)),
      ]
      .into_iter()
      .filter_map(|(set, term)| set.then_some(term))
      .collect();
      assert_eq!(columns, expected, "mask {mask:#06b}");
    }
  }

  #[test]
  fn filter_values_never_reach_sql_text() {
    let filter = SongFilter {
      group: Some("'; DROP TABLE songs; --".into()),
      ..Default::default()
    };
    let r = Predicate::for_listing(&filter, Page::new(1, 0)).render();
    assert!(!r.sql.contains("DROP"));
    assert_eq!(r.params[0], Value::Text("'; DROP TABLE songs; --".into()));
  }
}
