use crate::core::order::next_order_key;
use crate::db::store::FeedStore;
use crate::errors::{AppError, AppResult};
use crate::models::pet::{NewPet, Pet, PetChanges};

/// High-level pet management (add / edit / delete).
pub struct PetLogic;

impl PetLogic {
    /// Validate and insert a pet at the end of the current order.
    pub fn add<S: FeedStore>(store: &mut S, pet: &NewPet) -> AppResult<Pet> {
        pet.validate()?;

        let order = next_order_key(&store.pets()?);
        let created = store.add_pet(pet, order)?;

        store.audit(
            "add",
            &format!("pet #{}", created.id),
            &format!("Added {} ({})", created.name, created.kind),
        );
        Ok(created)
    }

    /// Apply `changes` to an existing pet. The merged record is validated
    /// before anything is written.
    pub fn edit<S: FeedStore>(store: &mut S, pet_id: i64, changes: &PetChanges) -> AppResult<Pet> {
        let current = store.pet(pet_id)?.ok_or(AppError::PetNotFound(pet_id))?;

        if changes.is_empty() {
            return Ok(current);
        }

        let updated = changes.apply_to(&current)?;
        store.update_pet(&updated)?;

        store.audit(
            "edit",
            &format!("pet #{}", pet_id),
            &describe_changes(&current, &updated),
        );
        Ok(updated)
    }

    /// Delete a pet and, through the store, all of its feedings.
    /// Returns the removed pet and the number of feedings dropped.
    pub fn delete<S: FeedStore>(store: &mut S, pet_id: i64) -> AppResult<(Pet, usize)> {
        let pet = store.pet(pet_id)?.ok_or(AppError::PetNotFound(pet_id))?;
        let feeds = store.delete_pet(pet_id)?;

        store.audit(
            "del",
            &format!("pet #{}", pet_id),
            &format!("Deleted {} with {} feeding(s)", pet.name, feeds),
        );
        Ok((pet, feeds))
    }
}

fn describe_changes(old: &Pet, new: &Pet) -> String {
    let mut parts = Vec::new();

    if old.name != new.name {
        parts.push(format!("name '{}' → '{}'", old.name, new.name));
    }
    if old.kind != new.kind {
        parts.push(format!("type '{}' → '{}'", old.kind, new.kind));
    }
    if old.image != new.image {
        parts.push(if new.image.is_some() {
            "thumbnail updated".to_string()
        } else {
            "thumbnail removed".to_string()
        });
    }
    if (old.ideal_min_days, old.ideal_max_days) != (new.ideal_min_days, new.ideal_max_days) {
        parts.push(format!(
            "interval {} → {}",
            fmt_interval(old.ideal_min_days, old.ideal_max_days),
            fmt_interval(new.ideal_min_days, new.ideal_max_days)
        ));
    }

    if parts.is_empty() {
        "No changes".to_string()
    } else {
        parts.join(", ")
    }
}

pub fn fmt_interval(min: Option<u32>, max: Option<u32>) -> String {
    let side = |v: Option<u32>| v.map_or_else(|| "-".to_string(), |d| d.to_string());
    format!("[{}..{}]", side(min), side(max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::feed::record_feed;
    use crate::db::initialize::init_db;
    use crate::db::pool::DbPool;
    use chrono::NaiveDateTime;

    fn store() -> DbPool {
        let pool = DbPool::in_memory().unwrap();
        init_db(&pool.conn).unwrap();
        pool
    }

    #[test]
    fn new_pets_are_appended_after_the_last_key() {
        let mut pool = store();
        let a = PetLogic::add(&mut pool, &NewPet::new("A", "cat")).unwrap();
        let b = PetLogic::add(&mut pool, &NewPet::new("B", "cat")).unwrap();
        PetLogic::delete(&mut pool, a.id).unwrap();
        let c = PetLogic::add(&mut pool, &NewPet::new("C", "cat")).unwrap();

        assert_eq!(a.order, 0);
        assert_eq!(b.order, 1);
        assert_eq!(c.order, 2);
    }

    #[test]
    fn invalid_interval_is_rejected_on_add_and_edit() {
        let mut pool = store();
        let bad = NewPet::new("A", "cat").with_interval(Some(4), Some(2));
        assert!(matches!(
            PetLogic::add(&mut pool, &bad),
            Err(AppError::InvalidInterval(_))
        ));
        assert!(pool.pets().unwrap().is_empty());

        let ok = PetLogic::add(&mut pool, &NewPet::new("A", "cat").with_interval(Some(1), Some(3)))
            .unwrap();
        let changes = PetChanges {
            ideal_min_days: Some(Some(5)),
            ..Default::default()
        };
        assert!(PetLogic::edit(&mut pool, ok.id, &changes).is_err());
        assert_eq!(pool.pet(ok.id).unwrap().unwrap().ideal_min_days, Some(1));
    }

    #[test]
    fn edit_updates_only_requested_fields() {
        let mut pool = store();
        let pet = PetLogic::add(&mut pool, &NewPet::new("Mochi", "gecko")).unwrap();

        let changes = PetChanges {
            name: Some("Kinako".into()),
            ideal_max_days: Some(Some(4)),
            ..Default::default()
        };
        let updated = PetLogic::edit(&mut pool, pet.id, &changes).unwrap();

        assert_eq!(updated.name, "Kinako");
        assert_eq!(updated.kind, "gecko");
        assert_eq!(pool.pet(pet.id).unwrap().unwrap(), updated);
    }

    #[test]
    fn delete_cascades_and_reports_feed_count() {
        let mut pool = store();
        let pet = PetLogic::add(&mut pool, &NewPet::new("Mochi", "gecko")).unwrap();
        for s in ["2025-05-01 08:00", "2025-05-02 08:00"] {
            let at = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap();
            record_feed(&mut pool, pet.id, at).unwrap();
        }

        let (removed, feeds) = PetLogic::delete(&mut pool, pet.id).unwrap();
        assert_eq!(removed.id, pet.id);
        assert_eq!(feeds, 2);
        assert!(pool.feeds().unwrap().is_empty());
        assert!(matches!(
            PetLogic::delete(&mut pool, pet.id),
            Err(AppError::PetNotFound(_))
        ));
    }

    #[test]
    fn interval_formatting() {
        assert_eq!(fmt_interval(Some(2), Some(5)), "[2..5]");
        assert_eq!(fmt_interval(None, Some(5)), "[-..5]");
        assert_eq!(fmt_interval(None, None), "[-..-]");
    }
}
