//! Manual ordering of pets through an explicit order key.

use crate::db::store::FeedStore;
use crate::errors::{AppError, AppResult};
use crate::models::pet::Pet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,   // towards the start of the list (-1)
    Down, // towards the end of the list (+1)
}

impl Direction {
    pub fn from_offset(offset: i64) -> Option<Self> {
        match offset {
            -1 => Some(Direction::Up),
            1 => Some(Direction::Down),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Keys were exchanged with the neighbour `with`.
    Moved { with: i64 },
    /// Already first (or last); nothing written.
    Unchanged,
}

/// Display order: ascending order key, ties broken by id.
pub fn sort_pets(pets: &mut [Pet]) {
    pets.sort_by(|a, b| a.order.cmp(&b.order).then(a.id.cmp(&b.id)));
}

/// Order key for a pet appended at the end of the list.
pub fn next_order_key(pets: &[Pet]) -> i64 {
    pets.iter().map(|p| p.order).max().map_or(0, |max| max + 1)
}

/// Key updates that swap the pets at `idx` and `target` in `sorted`.
///
/// With unique keys this is a plain exchange of the two values. When keys
/// collide anywhere, an exchange could be absorbed by the id tie-break, so
/// the whole list is renumbered first and only changed keys are returned.
fn swap_updates(sorted: &[Pet], idx: usize, target: usize) -> Vec<(i64, i64)> {
    let unique = sorted.windows(2).all(|w| w[0].order < w[1].order);

    if unique {
        let (a, b) = (&sorted[idx], &sorted[target]);
        return vec![(a.id, b.order), (b.id, a.order)];
    }

    let mut keys: Vec<i64> = (0..sorted.len() as i64).collect();
    keys.swap(idx, target);

    sorted
        .iter()
        .zip(keys)
        .filter(|(p, key)| p.order != *key)
        .map(|(p, key)| (p.id, key))
        .collect()
}

/// Move `pet_id` one step in `direction`, persisting both keys in a single
/// store call so a half-applied swap is never visible.
pub fn move_adjacent<S: FeedStore>(store: &mut S, pet_id: i64, direction: Direction) -> AppResult<MoveOutcome> {
    let mut pets = store.pets()?;
    sort_pets(&mut pets);

    let idx = pets
        .iter()
        .position(|p| p.id == pet_id)
        .ok_or(AppError::PetNotFound(pet_id))?;

    let target = match direction {
        Direction::Up => idx.checked_sub(1),
        Direction::Down => Some(idx + 1).filter(|&t| t < pets.len()),
    };

    let Some(target) = target else {
        log::debug!("pet #{pet_id} cannot move {}: already at the edge", direction.as_str());
        return Ok(MoveOutcome::Unchanged);
    };

    let neighbour = pets[target].id;
    let updates = swap_updates(&pets, idx, target);
    store.set_orders(&updates)?;

    store.audit(
        "move",
        &format!("pet #{}", pet_id),
        &format!("Moved {} (swapped with pet #{})", direction.as_str(), neighbour),
    );

    Ok(MoveOutcome::Moved { with: neighbour })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize::init_db;
    use crate::db::pool::DbPool;
    use crate::models::pet::NewPet;

    fn store_with(orders: &[i64]) -> (DbPool, Vec<i64>) {
        let mut pool = DbPool::in_memory().unwrap();
        init_db(&pool.conn).unwrap();
        let ids = orders
            .iter()
            .enumerate()
            .map(|(i, &o)| pool.add_pet(&NewPet::new(format!("P{i}"), "cat"), o).unwrap().id)
            .collect();
        (pool, ids)
    }

    fn listed(pool: &DbPool) -> Vec<(i64, i64)> {
        pool.pets().unwrap().iter().map(|p| (p.id, p.order)).collect()
    }

    #[test]
    fn first_pet_cannot_move_up_and_last_cannot_move_down() {
        let (mut pool, ids) = store_with(&[0, 1, 2]);
        let before = listed(&pool);

        assert_eq!(move_adjacent(&mut pool, ids[0], Direction::Up).unwrap(), MoveOutcome::Unchanged);
        assert_eq!(move_adjacent(&mut pool, ids[2], Direction::Down).unwrap(), MoveOutcome::Unchanged);
        assert_eq!(listed(&pool), before);
    }

    #[test]
    fn middle_pet_swaps_keys_with_its_neighbour() {
        let (mut pool, ids) = store_with(&[0, 1, 2]);

        let out = move_adjacent(&mut pool, ids[1], Direction::Up).unwrap();
        assert_eq!(out, MoveOutcome::Moved { with: ids[0] });
        assert_eq!(listed(&pool), vec![(ids[1], 0), (ids[0], 1), (ids[2], 2)]);

        move_adjacent(&mut pool, ids[1], Direction::Down).unwrap();
        assert_eq!(listed(&pool), vec![(ids[0], 0), (ids[1], 1), (ids[2], 2)]);
    }

    #[test]
    fn gaps_in_keys_are_preserved_by_a_swap() {
        let (mut pool, ids) = store_with(&[0, 4, 9]);
        move_adjacent(&mut pool, ids[2], Direction::Up).unwrap();
        assert_eq!(listed(&pool), vec![(ids[0], 0), (ids[2], 4), (ids[1], 9)]);
    }

    #[test]
    fn colliding_keys_are_renumbered_so_the_move_is_visible() {
        let (mut pool, ids) = store_with(&[1, 1, 1]);

        move_adjacent(&mut pool, ids[2], Direction::Up).unwrap();
        let order: Vec<i64> = listed(&pool).iter().map(|(id, _)| *id).collect();
        assert_eq!(order, vec![ids[0], ids[2], ids[1]]);
    }

    #[test]
    fn unknown_pet_is_reported() {
        let (mut pool, _) = store_with(&[0]);
        assert!(matches!(
            move_adjacent(&mut pool, 99, Direction::Down),
            Err(AppError::PetNotFound(99))
        ));
    }

    #[test]
    fn next_key_appends_after_the_largest() {
        let (pool, _) = store_with(&[0, 7, 3]);
        assert_eq!(next_order_key(&pool.pets().unwrap()), 8);
        assert_eq!(next_order_key(&[]), 0);
    }

    #[test]
    fn direction_from_offset() {
        assert_eq!(Direction::from_offset(-1), Some(Direction::Up));
        assert_eq!(Direction::from_offset(1), Some(Direction::Down));
        assert_eq!(Direction::from_offset(0), None);
    }
}
