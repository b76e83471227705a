//! JSON export and destructive import of the whole pets + feeds dataset.

use crate::db::initialize::INITIALIZED_KEY;
use crate::db::store::FeedStore;
use crate::errors::{AppError, AppResult};
use crate::models::feed::FeedEvent;
use crate::models::pet::{Pet, validate_interval};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

const EXPORT_STAMP: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetEntry {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default)]
    pub ideal_min_days: Option<u32>,
    #[serde(default)]
    pub ideal_max_days: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedEntry {
    #[serde(default)]
    pub id: Option<i64>,
    pub pet_id: i64,
    pub date: String,
}

/// Shape written by `export`.
#[derive(Debug, Serialize)]
pub struct ExportDocument {
    pub pets: Vec<PetEntry>,
    pub feeds: Vec<FeedEntry>,
}

/// Shape accepted by `import`; both collections must be present.
#[derive(Debug, Deserialize)]
struct ImportDocument {
    pets: Option<Vec<PetEntry>>,
    feeds: Option<Vec<FeedEntry>>,
}

/// Validated content of an import document.
#[derive(Debug)]
pub struct ImportPlan {
    pub pets: Vec<Pet>,
    pub feeds: Vec<FeedEvent>,
    /// Same-day duplicates dropped while building the plan.
    pub collapsed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub pets: usize,
    pub feeds: usize,
    pub collapsed: usize,
}

pub fn build_document<S: FeedStore>(store: &S) -> AppResult<ExportDocument> {
    let pets = store
        .pets()?
        .into_iter()
        .map(|p| PetEntry {
            id: p.id,
            name: p.name,
            kind: p.kind,
            image: p.image,
            order: Some(p.order),
            ideal_min_days: p.ideal_min_days,
            ideal_max_days: p.ideal_max_days,
        })
        .collect();

    let feeds = store
        .feeds()?
        .into_iter()
        .map(|f| FeedEntry {
            id: Some(f.id),
            pet_id: f.pet_id,
            date: f.fed_at.format(EXPORT_STAMP).to_string(),
        })
        .collect();

    Ok(ExportDocument { pets, feeds })
}

pub fn export_json<S: FeedStore>(store: &S) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(&build_document(store)?)?)
}

/// Accepts RFC 3339, ISO local date-times (with `T` or a space) and bare
/// dates (taken as noon so they stay on their calendar day).
fn parse_feed_date(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| NaiveTime::from_hms_opt(12, 0, 0).map(|t| d.and_time(t)))
}

/// Parse and validate a document without touching any store.
pub fn parse_document(json: &str) -> AppResult<ImportPlan> {
    let doc: ImportDocument = serde_json::from_str(json)?;

    let pet_entries = doc
        .pets
        .ok_or_else(|| AppError::Import("document has no 'pets' collection".into()))?;
    let feed_entries = doc
        .feeds
        .ok_or_else(|| AppError::Import("document has no 'feeds' collection".into()))?;

    // --- pets ---
    let mut seen = HashSet::new();
    let mut pets = Vec::with_capacity(pet_entries.len());

    for (idx, p) in pet_entries.into_iter().enumerate() {
        if !seen.insert(p.id) {
            return Err(AppError::Import(format!("pet id {} appears twice", p.id)));
        }
        if p.name.trim().is_empty() || p.kind.trim().is_empty() {
            return Err(AppError::Import(format!("pet #{} has an empty name or type", p.id)));
        }
        validate_interval(p.ideal_min_days, p.ideal_max_days)
            .map_err(|e| AppError::Import(format!("pet #{}: {}", p.id, e)))?;

        pets.push(Pet {
            id: p.id,
            name: p.name,
            kind: p.kind,
            image: p.image,
            order: p.order.unwrap_or(idx as i64),
            ideal_min_days: p.ideal_min_days,
            ideal_max_days: p.ideal_max_days,
        });
    }

    // --- feeds ---
    let mut parsed = Vec::with_capacity(feed_entries.len());
    for f in &feed_entries {
        if !seen.contains(&f.pet_id) {
            return Err(AppError::Import(format!(
                "feeding dated {} references unknown pet #{}",
                f.date, f.pet_id
            )));
        }
        let fed_at = parse_feed_date(&f.date)
            .ok_or_else(|| AppError::Import(format!("unreadable feeding date '{}'", f.date)))?;
        parsed.push((f.id, f.pet_id, fed_at));
    }

    // one feeding per pet and day: the earliest one wins
    parsed.sort_by_key(|(_, pet_id, fed_at)| (*pet_id, *fed_at));
    let mut by_day: HashMap<(i64, NaiveDate), ()> = HashMap::new();
    let before = parsed.len();
    parsed.retain(|(_, pet_id, fed_at)| by_day.insert((*pet_id, fed_at.date()), ()).is_none());
    let collapsed = before - parsed.len();

    let ids: Vec<Option<i64>> = parsed.iter().map(|(id, _, _)| *id).collect();
    let keep_ids = ids.iter().all(Option::is_some)
        && ids.iter().flatten().collect::<HashSet<_>>().len() == ids.len();

    let feeds = parsed
        .into_iter()
        .enumerate()
        .map(|(i, (id, pet_id, fed_at))| FeedEvent {
            id: if keep_ids { id.unwrap_or(i as i64 + 1) } else { i as i64 + 1 },
            pet_id,
            fed_at,
        })
        .collect();

    Ok(ImportPlan {
        pets,
        feeds,
        collapsed,
    })
}

/// Replace the store content with the validated plan.
pub fn apply_import<S: FeedStore>(store: &mut S, plan: &ImportPlan) -> AppResult<ImportSummary> {
    store.replace_all(&plan.pets, &plan.feeds)?;
    store.set_meta(INITIALIZED_KEY, "true")?;

    let summary = ImportSummary {
        pets: plan.pets.len(),
        feeds: plan.feeds.len(),
        collapsed: plan.collapsed,
    };

    store.audit(
        "import",
        "all",
        &format!(
            "Replaced data with {} pets and {} feedings ({} duplicates dropped)",
            summary.pets, summary.feeds, summary.collapsed
        ),
    );
    Ok(summary)
}

/// Parse, validate and apply in one go. Nothing is written unless the
/// whole document is valid.
pub fn import_json<S: FeedStore>(store: &mut S, json: &str) -> AppResult<ImportSummary> {
    let plan = parse_document(json)?;
    apply_import(store, &plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::feed::record_feed;
    use crate::db::initialize::init_db;
    use crate::db::pool::DbPool;
    use crate::models::pet::NewPet;

    fn store() -> DbPool {
        let pool = DbPool::in_memory().unwrap();
        init_db(&pool.conn).unwrap();
        pool
    }

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    #[test]
    fn export_then_import_into_fresh_store_preserves_data() {
        let mut src = store();
        let a = src
            .add_pet(&NewPet::new("Mochi", "gecko").with_interval(Some(2), Some(4)), 3)
            .unwrap();
        let b = src.add_pet(&NewPet::new("Tama", "cat"), 1).unwrap();
        record_feed(&mut src, a.id, at("2025-05-01 08:00")).unwrap();
        record_feed(&mut src, b.id, at("2025-05-02 19:45")).unwrap();

        let json = export_json(&src).unwrap();
        assert!(json.contains("\"type\": \"gecko\""));
        assert!(json.contains("\"idealMinDays\": 2"));
        assert!(json.contains("\"petId\""));

        let mut dst = store();
        let summary = import_json(&mut dst, &json).unwrap();
        assert_eq!(summary.pets, 2);
        assert_eq!(summary.feeds, 2);

        assert_eq!(dst.pets().unwrap(), src.pets().unwrap());
        assert_eq!(dst.feeds().unwrap(), src.feeds().unwrap());
    }

    #[test]
    fn missing_collection_is_rejected_without_changes() {
        let mut pool = store();
        let keep = pool.add_pet(&NewPet::new("Keep", "cat"), 0).unwrap();

        for doc in [r#"{"pets": []}"#, r#"{"feeds": []}"#, r#"[]"#, "not json"] {
            assert!(import_json(&mut pool, doc).is_err(), "accepted {doc}");
        }
        assert_eq!(pool.pets().unwrap(), vec![keep]);
    }

    #[test]
    fn parse_errors_are_json_errors() {
        assert!(matches!(parse_document("{"), Err(AppError::Json(_))));
        assert!(matches!(
            parse_document(r#"{"pets": []}"#),
            Err(AppError::Import(_))
        ));
    }

    #[test]
    fn orphan_feeds_and_bad_intervals_are_rejected() {
        let orphan = r#"{"pets": [{"id": 1, "name": "A", "type": "cat"}],
                         "feeds": [{"id": 1, "petId": 2, "date": "2025-05-01"}]}"#;
        assert!(matches!(parse_document(orphan), Err(AppError::Import(_))));

        let inverted = r#"{"pets": [{"id": 1, "name": "A", "type": "cat",
                                     "idealMinDays": 5, "idealMaxDays": 2}],
                           "feeds": []}"#;
        assert!(matches!(parse_document(inverted), Err(AppError::Import(_))));

        let dup = r#"{"pets": [{"id": 1, "name": "A", "type": "cat"},
                                {"id": 1, "name": "B", "type": "cat"}],
                      "feeds": []}"#;
        assert!(matches!(parse_document(dup), Err(AppError::Import(_))));
    }

    #[test]
    fn same_day_duplicates_collapse_to_the_earliest() {
        let doc = r#"{
            "pets": [{"id": 7, "name": "A", "type": "cat"}],
            "feeds": [
                {"id": 1, "petId": 7, "date": "2025-05-01T19:00:00"},
                {"id": 2, "petId": 7, "date": "2025-05-01 08:00:00"},
                {"id": 3, "petId": 7, "date": "2025-05-02"}
            ]
        }"#;

        let plan = parse_document(doc).unwrap();
        assert_eq!(plan.collapsed, 1);
        assert_eq!(plan.feeds.len(), 2);
        assert_eq!(plan.feeds[0].id, 2);
        assert_eq!(plan.feeds[0].fed_at, at("2025-05-01 08:00"));
        assert_eq!(plan.feeds[1].fed_at, at("2025-05-02 12:00"));
        // no order key in the document: position is used
        assert_eq!(plan.pets[0].order, 0);
    }

    #[test]
    fn missing_feed_ids_are_renumbered() {
        let doc = r#"{
            "pets": [{"id": 1, "name": "A", "type": "cat"}],
            "feeds": [
                {"petId": 1, "date": "2025-05-02"},
                {"id": 9, "petId": 1, "date": "2025-05-01"}
            ]
        }"#;
        let plan = parse_document(doc).unwrap();
        let ids: Vec<i64> = plan.feeds.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn import_replaces_everything_and_keeps_seed_disabled() {
        let mut pool = store();
        let old = pool.add_pet(&NewPet::new("Old", "cat"), 0).unwrap();
        record_feed(&mut pool, old.id, at("2025-05-01 08:00")).unwrap();

        let doc = r#"{"pets": [{"id": 10, "name": "New", "type": "dog", "order": 4}],
                      "feeds": [{"id": 5, "petId": 10, "date": "2025-06-01T07:00:00"}]}"#;
        import_json(&mut pool, doc).unwrap();

        let pets = pool.pets().unwrap();
        assert_eq!(pets.len(), 1);
        assert_eq!(pets[0].id, 10);
        assert_eq!(pets[0].order, 4);
        assert_eq!(pool.feeds().unwrap().len(), 1);
        assert_eq!(pool.meta(INITIALIZED_KEY).unwrap().as_deref(), Some("true"));
    }
}
