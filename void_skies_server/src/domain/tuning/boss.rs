/// Gameplay tuning for the boss entity.
#[derive(Debug, Clone, Copy)]
pub struct BossTuning {
    /// Collision radius in arena units.
    pub radius: f64,
    /// Hit points before wave scaling.
    pub base_hp: f64,
    /// Spawn height, above the visible band.
    pub spawn_y: f64,
    /// Height at which the boss stops descending.
    pub hover_y: f64,
    /// Descent speed in units per second.
    pub descend_speed: f64,
    /// Angular frequency of the horizontal sway.
    pub sway_frequency: f64,
    /// Horizontal sway speed amplitude in units per second.
    pub sway_speed: f64,
    /// Keep-out margin from the left/right edges.
    pub edge_margin: f64,
    /// Minimum y once on screen.
    pub min_y: f64,
    /// Maximum y as a fraction of the arena height.
    pub max_y_fraction: f64,
}

impl Default for BossTuning {
    fn default() -> Self {
        Self {
            radius: 46.0,
            base_hp: 600.0,
            spawn_y: -60.0,
            hover_y: 100.0,
            descend_speed: 60.0,
            sway_frequency: 0.8,
            sway_speed: 40.0,
            edge_margin: 60.0,
            min_y: 60.0,
            max_y_fraction: 0.6,
        }
    }
}
