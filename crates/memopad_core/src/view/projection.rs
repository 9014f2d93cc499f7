//! Sorted/filtered memo views and a revision-keyed cache.

use crate::model::memo::{Memo, MemoFont};
use crate::repo::memo_repo::MemoRepository;
use crate::service::memo_store::MemoStore;
use std::fmt::{Display, Formatter};

/// Display order by creation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NewestFirst => "newest",
            Self::OldestFirst => "oldest",
        }
    }

    /// Accepts `newest|oldest` and the `-first` long forms, ignoring case.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "newest" | "newest-first" | "newest_first" => Some(Self::NewestFirst),
            "oldest" | "oldest-first" | "oldest_first" => Some(Self::OldestFirst),
            _ => None,
        }
    }
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display query: order plus optional filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewQuery {
    pub order: SortOrder,
    /// Case-insensitive substring match on memo text. Blank means no filter.
    pub text_filter: Option<String>,
    /// Exact font match.
    pub font: Option<MemoFont>,
}

impl ViewQuery {
    pub fn ordered(order: SortOrder) -> Self {
        Self {
            order,
            ..Self::default()
        }
    }

    fn matches(&self, memo: &Memo, needle: Option<&str>) -> bool {
        if let Some(font) = self.font {
            if memo.font != font {
                return false;
            }
        }
        match needle {
            Some(needle) => memo.text.to_lowercase().contains(needle),
            None => true,
        }
    }

    fn needle(&self) -> Option<String> {
        self.text_filter
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_lowercase)
    }
}

/// All memos ordered by `created_at`.
pub fn sorted_view(memos: &[Memo], order: SortOrder) -> Vec<&Memo> {
    filtered_view(memos, &ViewQuery::ordered(order))
}

/// Memos matching `query`, ordered by `created_at`.
pub fn filtered_view<'a>(memos: &'a [Memo], query: &ViewQuery) -> Vec<&'a Memo> {
    project_indices(memos, query)
        .into_iter()
        .map(|index| &memos[index])
        .collect()
}

fn project_indices(memos: &[Memo], query: &ViewQuery) -> Vec<usize> {
    let needle = query.needle();
    let mut indices = memos
        .iter()
        .enumerate()
        .filter(|(_, memo)| query.matches(memo, needle.as_deref()))
        .map(|(index, _)| index)
        .collect::<Vec<_>>();

    // `sort_by` is stable; ties keep list order in both directions.
    match query.order {
        SortOrder::NewestFirst => {
            indices.sort_by(|a, b| memos[*b].created_at.cmp(&memos[*a].created_at))
        }
        SortOrder::OldestFirst => {
            indices.sort_by(|a, b| memos[*a].created_at.cmp(&memos[*b].created_at))
        }
    }
    indices
}

/// Cache key: which store, at which revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Snapshot {
    store_id: u64,
    revision: u64,
}

/// Cached projection of a `MemoStore`.
///
/// Recomputes when the query changes, the store revision advances, or the
/// projection is handed a different store than last time.
#[derive(Debug, Default)]
pub struct MemoProjection {
    query: ViewQuery,
    cached: Option<(Snapshot, Vec<usize>)>,
    recomputes: u64,
}

impl MemoProjection {
    pub fn new(query: ViewQuery) -> Self {
        Self {
            query,
            cached: None,
            recomputes: 0,
        }
    }

    pub fn query(&self) -> &ViewQuery {
        &self.query
    }

    /// Replaces the query; the next `view` recomputes if it differs.
    pub fn set_query(&mut self, query: ViewQuery) {
        if self.query != query {
            self.query = query;
            self.cached = None;
        }
    }

    pub fn set_order(&mut self, order: SortOrder) {
        let query = ViewQuery {
            order,
            ..self.query.clone()
        };
        self.set_query(query);
    }

    /// Number of times the display sequence was recomputed.
    pub fn recompute_count(&self) -> u64 {
        self.recomputes
    }

    /// Returns the display sequence for `store`'s current list.
    pub fn view<'s, R: MemoRepository>(&mut self, store: &'s MemoStore<R>) -> Vec<&'s Memo> {
        let memos = store.memos();
        let snapshot = Snapshot {
            store_id: store.store_id(),
            revision: store.revision(),
        };
        let fresh = matches!(&self.cached, Some((cached, _)) if *cached == snapshot);
        if !fresh {
            self.cached = Some((snapshot, project_indices(memos, &self.query)));
            self.recomputes += 1;
        }

        self.cached
            .as_ref()
            .map(|(_, indices)| indices.iter().map(|index| &memos[*index]).collect())
            .unwrap_or_default()
    }
}
