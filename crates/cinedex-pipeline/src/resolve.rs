//! Movie-title resolution.
//!
//! The loader seeds link flags from the extract; this pass makes the
//! one-primary/one-original invariant hold for every linked movie. It
//! never fails on ambiguity — conflicts are settled by the lowest link id,
//! which is stable insertion order.

use std::collections::{HashMap, HashSet};

use cinedex_core::entity::{NewTitleLink, TitleFlagFix, TitleLinkRow};
use cinedex_store_sqlite::SqliteStore;
use tracing::{info, warn};

use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionReport {
  /// Links inserted for declared titles the extract never listed.
  pub links_added: usize,
  /// Links whose flags were rewritten.
  pub flags_fixed: usize,
  /// Movies still violating the invariant afterwards; expected zero.
  pub violations:  usize,
}

/// Run the resolution ladder over a loaded store.
pub async fn resolve_titles(store: &SqliteStore) -> Result<ResolutionReport> {
  let links_added = add_declared_links(store).await?;

  let links = store.title_links().await?;
  let mut by_movie: HashMap<&str, Vec<&TitleLinkRow>> = HashMap::new();
  for link in &links {
    by_movie.entry(link.movie_id.as_str()).or_default().push(link);
  }

  let mut fixes = Vec::new();
  for group in by_movie.values() {
    fixes.extend(settle_flags(group));
  }
  let flags_fixed = store.update_title_flags(fixes).await?;

  let violations = store.title_flag_violations().await?.len();
  if violations > 0 {
    warn!(violations, "title flags still inconsistent after resolution");
  }
  info!(links_added, flags_fixed, "title resolution finished");
  Ok(ResolutionReport { links_added, flags_fixed, violations })
}

/// Insert link rows for declared primary/original titles that the variant
/// file never linked. A declared pair naming the same string becomes one
/// row flagged both ways.
async fn add_declared_links(store: &SqliteStore) -> Result<usize> {
  let lookup = store.title_lookup().await?;
  let linked: HashSet<(String, i64)> = store
    .title_links()
    .await?
    .into_iter()
    .map(|l| (l.movie_id, l.title_id))
    .collect();

  let mut additions: Vec<NewTitleLink> = Vec::new();
  for (movie_id, primary, original) in store.movie_title_hints().await? {
    let primary = normalize(primary.as_deref());
    let original = normalize(original.as_deref());
    let same = matches!((&primary, &original), (Some(p), Some(o)) if p == o);

    if let Some(title_id) = primary.and_then(|t| lookup.get(&t).copied()) {
      if !linked.contains(&(movie_id.clone(), title_id)) {
        additions.push(NewTitleLink {
          movie_id:    movie_id.clone(),
          title_id,
          is_primary:  true,
          is_original: same,
        });
      }
    }
    if !same {
      if let Some(title_id) = original.and_then(|t| lookup.get(&t).copied()) {
        if !linked.contains(&(movie_id.clone(), title_id)) {
          additions.push(NewTitleLink {
            movie_id: movie_id.clone(),
            title_id,
            is_primary: false,
            is_original: true,
          });
        }
      }
    }
  }

  let report = store.import_title_links(additions).await?;
  Ok(report.inserted)
}

fn normalize(title: Option<&str>) -> Option<String> {
  title
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .map(str::to_lowercase)
}

/// Decide the final flags for one movie's links (assumed ordered by link
/// id) and return fixes for the links that need to change.
fn settle_flags(links: &[&TitleLinkRow]) -> Vec<TitleFlagFix> {
  let first_with = |flag: fn(&TitleLinkRow) -> bool| {
    links.iter().find(|l| flag(l)).map(|l| l.link_id)
  };
  let mut primary = first_with(|l| l.is_primary);
  let mut original = first_with(|l| l.is_original);

  // Promotion: a lone flag covers both roles; no flags at all fall back
  // to the first link.
  match (primary, original) {
    (Some(p), None) => original = Some(p),
    (None, Some(o)) => primary = Some(o),
    (None, None) => {
      let fallback = links.first().map(|l| l.link_id);
      primary = fallback;
      original = fallback;
    }
    (Some(_), Some(_)) => {}
  }

  links
    .iter()
    .filter_map(|link| {
      let fix = TitleFlagFix {
        link_id:     link.link_id,
        is_primary:  primary == Some(link.link_id),
        is_original: original == Some(link.link_id),
      };
      let unchanged =
        fix.is_primary == link.is_primary && fix.is_original == link.is_original;
      (!unchanged).then_some(fix)
    })
    .collect()
}

#[cfg(test)]
mod unit {
  use super::*;

  fn link(link_id: i64, is_primary: bool, is_original: bool) -> TitleLinkRow {
    TitleLinkRow {
      link_id,
      movie_id: "tt1".to_owned(),
      title_id: link_id,
      is_primary,
      is_original,
    }
  }

  #[test]
  fn conflicting_primaries_keep_the_lowest_link() {
    let rows = [link(1, true, false), link(2, true, true)];
    let group: Vec<_> = rows.iter().collect();
    let fixes = settle_flags(&group);
    assert_eq!(
      fixes,
      vec![TitleFlagFix { link_id: 2, is_primary: false, is_original: true }],
    );
  }

  #[test]
  fn a_lone_primary_is_promoted_to_original() {
    let rows = [link(1, false, false), link(2, true, false)];
    let group: Vec<_> = rows.iter().collect();
    let fixes = settle_flags(&group);
    assert_eq!(
      fixes,
      vec![TitleFlagFix { link_id: 2, is_primary: true, is_original: true }],
    );
  }

  #[test]
  fn a_lone_original_is_promoted_to_primary() {
    let rows = [link(1, false, true), link(2, false, false)];
    let group: Vec<_> = rows.iter().collect();
    let fixes = settle_flags(&group);
    assert_eq!(
      fixes,
      vec![TitleFlagFix { link_id: 1, is_primary: true, is_original: true }],
    );
  }

  #[test]
  fn no_flags_fall_back_to_the_first_link() {
    let rows = [link(3, false, false), link(5, false, false)];
    let group: Vec<_> = rows.iter().collect();
    let fixes = settle_flags(&group);
    assert_eq!(
      fixes,
      vec![TitleFlagFix { link_id: 3, is_primary: true, is_original: true }],
    );
  }

  #[test]
  fn consistent_flags_need_no_fix() {
    let rows = [link(1, true, true), link(2, false, false)];
    let group: Vec<_> = rows.iter().collect();
    assert!(settle_flags(&group).is_empty());
  }
}
