//! Food items and the registry agents forage from.

use glam::DVec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Stable handle to a food item. Never reused, so a stale handle simply reads as consumed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FoodId(pub u64);

#[derive(Clone, Debug, PartialEq)]
pub struct FoodItem {
    pub id: FoodId,
    pub position: DVec3,
    pub nutritional_value: f64,
}

/// Queries the steering core needs from whatever owns the food.
pub trait FoodSource {
    /// First live item (in scan order) strictly within `radius` of `point`.
    fn any_within(&self, point: DVec3, radius: f64) -> Option<FoodId>;

    fn is_alive(&self, id: FoodId) -> bool;

    fn position(&self, id: FoodId) -> Option<DVec3>;

    /// Consume `id`. Returns the item only for the first caller; later calls are no-ops.
    fn remove(&mut self, id: FoodId) -> Option<FoodItem>;
}

/// Live food items in spawn order.
#[derive(Clone, Debug, Default)]
pub struct FoodRegistry {
    items: Vec<FoodItem>,
    next_id: u64,
    total_consumed: usize,
}

impl FoodRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, position: DVec3, nutritional_value: f64) -> FoodId {
        let id = FoodId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.items.push(FoodItem {
            id,
            position,
            nutritional_value,
        });
        id
    }

    pub fn get(&self, id: FoodId) -> Option<&FoodItem> {
        self.index_of(id).map(|idx| &self.items[idx])
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FoodItem> {
        self.items.iter()
    }

    /// Items removed through [`FoodSource::remove`] since creation.
    pub fn total_consumed(&self) -> usize {
        self.total_consumed
    }

    fn index_of(&self, id: FoodId) -> Option<usize> {
        // Ids are handed out in increasing order and removal keeps order.
        self.items.binary_search_by_key(&id, |item| item.id).ok()
    }
}

impl FoodSource for FoodRegistry {
    fn any_within(&self, point: DVec3, radius: f64) -> Option<FoodId> {
        let r_sq = radius * radius;
        self.items
            .iter()
            .find(|item| item.position.distance_squared(point) < r_sq)
            .map(|item| item.id)
    }

    fn is_alive(&self, id: FoodId) -> bool {
        self.index_of(id).is_some()
    }

    fn position(&self, id: FoodId) -> Option<DVec3> {
        self.get(id).map(|item| item.position)
    }

    fn remove(&mut self, id: FoodId) -> Option<FoodItem> {
        let idx = self.index_of(id)?;
        self.total_consumed += 1;
        Some(self.items.remove(idx))
    }
}

/// Timer-driven food placement around the arena center.
#[derive(Clone, Debug)]
pub struct FoodSpawner {
    max_food: usize,
    interval: f64,
    radius: f64,
    height: f64,
    nutritional_value: f64,
    timer: f64,
}

impl FoodSpawner {
    pub fn new(
        max_food: usize,
        interval: f64,
        radius: f64,
        height: f64,
        nutritional_value: f64,
    ) -> Self {
        Self {
            max_food,
            interval,
            radius,
            height,
            nutritional_value,
            timer: 0.0,
        }
    }

    /// Seed the registry with half the cap.
    pub fn prefill<R: Rng + ?Sized>(
        &self,
        registry: &mut FoodRegistry,
        center: DVec3,
        rng: &mut R,
    ) -> usize {
        let count = self.max_food / 2;
        for _ in 0..count {
            self.spawn_one(registry, center, rng);
        }
        count
    }

    /// Advance the timer; spawns at most one item per elapsed interval while under the cap.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        dt: f64,
        registry: &mut FoodRegistry,
        center: DVec3,
        rng: &mut R,
    ) -> usize {
        if self.interval <= 0.0 {
            return 0;
        }
        self.timer += dt;
        let mut spawned = 0;
        while self.timer >= self.interval {
            self.timer -= self.interval;
            if registry.len() < self.max_food {
                self.spawn_one(registry, center, rng);
                spawned += 1;
            }
        }
        spawned
    }

    fn spawn_one<R: Rng + ?Sized>(
        &self,
        registry: &mut FoodRegistry,
        center: DVec3,
        rng: &mut R,
    ) -> FoodId {
        let offset = sample_in_unit_sphere(rng) * self.radius;
        let position = DVec3::new(
            center.x + offset.x,
            center.y + self.height,
            center.z + offset.z,
        );
        registry.spawn(position, self.nutritional_value)
    }
}

fn sample_in_unit_sphere<R: Rng + ?Sized>(rng: &mut R) -> DVec3 {
    loop {
        let candidate = DVec3::new(
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
        );
        if candidate.length_squared() <= 1.0 {
            return candidate;
        }
    }
}
