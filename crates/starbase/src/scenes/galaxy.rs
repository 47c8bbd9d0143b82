//! # Galaxy
//!
//! Mission state: the 8×8 quadrant grid, the sectors of the ship's quadrant
//! and the ship's supplies.
//!
//! Generation is driven by a caller-supplied RNG, so a seeded
//! [`ChaCha8Rng`](rand_chacha::ChaCha8Rng) replays the same mission.

use rand::Rng;

use crate::widgets::display::CHART_SIDE;
use crate::widgets::{Condition, GalaxyChart, SectorCell, SectorChart, Status};

/// Energy after docking or at mission start.
pub const FULL_ENERGY: i32 = 4000;
/// Photon torpedoes after docking or at mission start.
pub const FULL_TORPEDOES: i32 = 10;
/// Stardates allowed for the mission.
pub const MISSION_STARDATES: i32 = 30;
/// Stardate the mission ends on when no time is left.
pub const FINAL_STARDATE: i32 = 3230;

/// Upper bound of the Klingon roll for a normal game.
const NORMAL_ROLL: u32 = 2999;
/// Upper bound of the Klingon roll for a difficult game.
const DIFFICULT_ROLL: u32 = 999;
/// A roll below each threshold adds one Klingon.
const KLINGON_THRESHOLDS: [u32; 6] = [209, 99, 49, 24, 9, 2];

/// Minimum galaxy population accepted by generation.
const MIN_STARBASES: u32 = 2;
const MIN_KLINGONS: u32 = 4;

const QUADRANTS: usize = CHART_SIDE * CHART_SIDE;

/// Contents of one quadrant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Quadrant {
    /// Klingon cruisers, 0..=6.
    pub klingons: u8,
    /// Whether the quadrant has a starbase.
    pub starbase: bool,
    /// Stars, 1..=8.
    pub stars: u8,
    /// Whether a sensor has reported this quadrant.
    pub scanned: bool,
}

impl Quadrant {
    /// Returns the three-digit summary `klingons, starbase, stars`.
    #[must_use]
    pub fn summary(&self) -> u16 {
        u16::from(self.klingons) * 100 + u16::from(self.starbase) * 10 + u16::from(self.stars)
    }
}

/// The running mission.
#[derive(Clone, Debug)]
pub struct Galaxy {
    quadrants: [Quadrant; QUADRANTS],
    sectors: SectorChart,
    /// Ship quadrant (`row`, `column`, zero based).
    quadrant: (usize, usize),
    /// Ship sector in the current quadrant.
    sector: (usize, usize),
    energy: i32,
    torpedoes: i32,
    time_left: i32,
    docked: bool,
    klingons: u32,
    starbases: u32,
}

impl Galaxy {
    /// Rolls a new galaxy and places the ship.
    ///
    /// Rolls are repeated until the galaxy holds at least two starbases and
    /// four Klingons. The sectors are empty until
    /// [`enter_quadrant`](Self::enter_quadrant) is called.
    pub fn generate(rng: &mut impl Rng, difficult: bool) -> Self {
        let roll = if difficult { DIFFICULT_ROLL } else { NORMAL_ROLL };

        let mut quadrants = [Quadrant::default(); QUADRANTS];
        let (klingons, starbases) = loop {
            let mut klingons = 0;
            let mut starbases = 0;
            for quadrant in &mut quadrants {
                let starbase = rng.gen_range(1..=99) < 5;
                let m = rng.gen_range(1..=roll);
                let count = KLINGON_THRESHOLDS.iter().filter(|&&t| m < t).count();
                *quadrant = Quadrant {
                    // At most the number of thresholds.
                    klingons: u8::try_from(count).unwrap_or(u8::MAX),
                    starbase,
                    stars: rng.gen_range(1..=8),
                    scanned: false,
                };
                klingons += u32::from(quadrant.klingons);
                starbases += u32::from(starbase);
            }
            if starbases >= MIN_STARBASES && klingons >= MIN_KLINGONS {
                break (klingons, starbases);
            }
            tracing::debug!(klingons, starbases, "galaxy rejected, rolling again");
        };

        let quadrant = (rng.gen_range(0..CHART_SIDE), rng.gen_range(0..CHART_SIDE));
        let sector = (rng.gen_range(0..CHART_SIDE), rng.gen_range(0..CHART_SIDE));
        tracing::info!(klingons, starbases, difficult, "galaxy generated");

        Self {
            quadrants,
            sectors: SectorChart::new(),
            quadrant,
            sector,
            energy: FULL_ENERGY,
            torpedoes: FULL_TORPEDOES,
            time_left: MISSION_STARDATES,
            docked: false,
            klingons,
            starbases,
        }
    }

    /// Fills the sectors of the ship's quadrant.
    ///
    /// The ship goes first, then the Klingons, the starbase and the stars,
    /// each on a random empty sector.
    ///
    /// # Returns
    ///
    /// `true` if the ship ended up docked without having been docked before.
    pub fn enter_quadrant(&mut self, rng: &mut impl Rng) -> bool {
        self.sectors = SectorChart::new();
        let (row, column) = self.sector;
        self.sectors.set(row, column, SectorCell::Enterprise);

        let here = *self.current();
        for _ in 0..here.klingons {
            self.place(rng, SectorCell::Klingon);
        }
        if here.starbase {
            self.place(rng, SectorCell::Starbase);
        }
        for _ in 0..here.stars {
            self.place(rng, SectorCell::Star);
        }

        self.check_docking()
    }

    fn place(&mut self, rng: &mut impl Rng, cell: SectorCell) {
        loop {
            let row = rng.gen_range(0..CHART_SIDE);
            let column = rng.gen_range(0..CHART_SIDE);
            if self.sectors.get(row, column) == SectorCell::Empty {
                self.sectors.set(row, column, cell);
                return;
            }
        }
    }

    /// Docks if a starbase is adjacent to the ship, restoring energy and
    /// torpedoes.
    ///
    /// # Returns
    ///
    /// `true` if the ship just docked.
    pub fn check_docking(&mut self) -> bool {
        let (row, column) = self.sector;
        let mut rows = row.saturating_sub(1)..=(row + 1).min(CHART_SIDE - 1);
        let adjacent = rows.any(|r| {
            let mut columns = column.saturating_sub(1)..=(column + 1).min(CHART_SIDE - 1);
            columns.any(|c| self.sectors.get(r, c) == SectorCell::Starbase)
        });

        let arrived = adjacent && !self.docked;
        self.docked = adjacent;
        if adjacent {
            self.energy = FULL_ENERGY;
            self.torpedoes = FULL_TORPEDOES;
        }
        arrived
    }

    fn current(&self) -> &Quadrant {
        &self.quadrants[self.quadrant.0 * CHART_SIDE + self.quadrant.1]
    }

    /// Returns a quadrant. Out of range yields `None`.
    #[must_use]
    pub fn quadrant_at(&self, row: usize, column: usize) -> Option<&Quadrant> {
        if row < CHART_SIDE && column < CHART_SIDE {
            self.quadrants.get(row * CHART_SIDE + column)
        } else {
            None
        }
    }

    /// Returns the ship's quadrant and sector, zero based.
    #[must_use]
    pub const fn position(&self) -> ((usize, usize), (usize, usize)) {
        (self.quadrant, self.sector)
    }

    /// Formats the ship position, one based: `ENTERPRISE IN Q-45 S-27`.
    #[must_use]
    pub fn position_line(&self) -> String {
        let ((qr, qc), (sr, sc)) = self.position();
        format!("ENTERPRISE IN Q-{}{} S-{}{}", qr + 1, qc + 1, sr + 1, sc + 1)
    }

    /// Klingons left in the galaxy.
    #[must_use]
    pub const fn klingons(&self) -> u32 {
        self.klingons
    }

    /// Starbases left in the galaxy.
    #[must_use]
    pub const fn starbases(&self) -> u32 {
        self.starbases
    }

    /// Checks whether the ship is docked.
    #[must_use]
    pub const fn is_docked(&self) -> bool {
        self.docked
    }

    /// Returns the alert condition.
    #[must_use]
    pub fn condition(&self) -> Condition {
        Condition::assess(
            self.docked,
            u32::from(self.current().klingons),
            self.energy,
        )
    }

    /// Returns the status shown by the report.
    #[must_use]
    pub fn status(&self) -> Status {
        Status {
            stardate: FINAL_STARDATE - self.time_left,
            time_left: self.time_left,
            condition: self.condition(),
            energy: self.energy,
            torpedoes: self.torpedoes,
            klingons: self.klingons,
            starbases: self.starbases,
        }
    }

    /// Reports the ship's quadrant to the galaxy chart.
    pub fn scan_short_range(&mut self) {
        let (row, column) = self.quadrant;
        self.quadrants[row * CHART_SIDE + column].scanned = true;
    }

    /// Reports the 3×3 neighbourhood of the ship's quadrant.
    ///
    /// # Returns
    ///
    /// The summaries row by row; `None` outside the galaxy.
    pub fn scan_long_range(&mut self) -> [[Option<u16>; 3]; 3] {
        let (row, column) = self.quadrant;
        let mut scan = [[None; 3]; 3];
        for (dr, line) in scan.iter_mut().enumerate() {
            for (dc, value) in line.iter_mut().enumerate() {
                let (Some(r), Some(c)) = ((row + dr).checked_sub(1), (column + dc).checked_sub(1))
                else {
                    continue;
                };
                if r < CHART_SIDE && c < CHART_SIDE {
                    let quadrant = &mut self.quadrants[r * CHART_SIDE + c];
                    quadrant.scanned = true;
                    *value = Some(quadrant.summary());
                }
            }
        }
        scan
    }

    /// Builds the galaxy chart from the scanned quadrants.
    #[must_use]
    pub fn galaxy_chart(&self) -> GalaxyChart {
        let mut chart = GalaxyChart::new(self.quadrant);
        for row in 0..CHART_SIDE {
            for column in 0..CHART_SIDE {
                let quadrant = &self.quadrants[row * CHART_SIDE + column];
                if quadrant.scanned {
                    chart.record(row, column, quadrant.summary());
                }
            }
        }
        chart
    }

    /// Returns the sectors of the ship's quadrant.
    #[must_use]
    pub const fn sector_chart(&self) -> SectorChart {
        self.sectors
    }
}
