//! Toroidal occupancy grid
//!
//! The authoritative spatial index of the road. Positions wrap around the
//! width axis; the lane axis does not wrap. Each cell holds at most one
//! vehicle.

use std::collections::HashMap;

use super::error::{SimError, SimResult};
use super::types::{Cell, Direction, VehicleId};

/// Occupancy index over `width × lanes` cells
#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    lanes: usize,
    /// Row-major by lane: `cells[lane * width + x]`
    cells: Vec<Option<VehicleId>>,
    /// Reverse index so a move only needs the target cell
    locations: HashMap<VehicleId, Cell>,
}

impl Grid {
    pub fn new(width: usize, lanes: usize) -> SimResult<Self> {
        if width == 0 {
            return Err(SimError::Config("grid width must be positive".to_string()));
        }
        if !(1..=2).contains(&lanes) {
            return Err(SimError::Config(format!(
                "grid lane count must be 1 or 2, got {lanes}"
            )));
        }
        Ok(Self {
            width,
            lanes,
            cells: vec![None; width * lanes],
            locations: HashMap::new(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn lanes(&self) -> usize {
        self.lanes
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of vehicles currently on the grid
    pub fn occupied_count(&self) -> usize {
        self.locations.len()
    }

    /// Wrap a signed position onto the ring
    pub fn wrap(&self, x: i64) -> usize {
        x.rem_euclid(self.width as i64) as usize
    }

    fn index(&self, lane: usize, x: usize) -> Option<usize> {
        if lane < self.lanes {
            Some(lane * self.width + self.wrap(x as i64))
        } else {
            None
        }
    }

    fn checked_index(&self, lane: usize, x: usize) -> SimResult<usize> {
        self.index(lane, x).ok_or_else(|| {
            SimError::Config(format!(
                "lane {lane} is outside a road with {} lane(s)",
                self.lanes
            ))
        })
    }

    /// The vehicle at a cell, if any. Lanes outside the road are empty.
    pub fn occupant(&self, lane: usize, x: usize) -> Option<VehicleId> {
        self.index(lane, x).and_then(|i| self.cells[i])
    }

    pub fn is_empty(&self, lane: usize, x: usize) -> bool {
        self.occupant(lane, x).is_none()
    }

    /// Where a vehicle currently sits
    pub fn location(&self, vehicle: VehicleId) -> Option<Cell> {
        self.locations.get(&vehicle).copied()
    }

    /// Put a vehicle that is not yet on the grid into an empty cell
    pub fn place(&mut self, vehicle: VehicleId, lane: usize, x: usize) -> SimResult<()> {
        let index = self.checked_index(lane, x)?;
        if self.cells[index].is_some() {
            return Err(SimError::OccupiedCell {
                lane,
                x: self.wrap(x as i64),
            });
        }
        if self.locations.contains_key(&vehicle) {
            return Err(SimError::AlreadyPlaced(vehicle));
        }
        self.cells[index] = Some(vehicle);
        self.locations.insert(vehicle, Cell::new(lane, self.wrap(x as i64)));
        Ok(())
    }

    /// Vacate the vehicle's cell and occupy the target as one operation.
    ///
    /// Fails without touching the grid if the target is occupied by another
    /// vehicle. Moving onto the vehicle's own cell is a no-op.
    pub fn move_vehicle(
        &mut self,
        vehicle: VehicleId,
        new_lane: usize,
        new_x: usize,
    ) -> SimResult<()> {
        let target = self.checked_index(new_lane, new_x)?;
        let from = self
            .locations
            .get(&vehicle)
            .copied()
            .ok_or(SimError::UnknownVehicle(vehicle))?;

        match self.cells[target] {
            Some(other) if other != vehicle => {
                return Err(SimError::OccupiedCell {
                    lane: new_lane,
                    x: self.wrap(new_x as i64),
                })
            }
            Some(_) => return Ok(()),
            None => {}
        }

        let source = from.lane * self.width + from.x;
        self.cells[source] = None;
        self.cells[target] = Some(vehicle);
        self.locations
            .insert(vehicle, Cell::new(new_lane, self.wrap(new_x as i64)));
        Ok(())
    }

    /// Count of empty cells between `x` and the nearest vehicle in `direction`.
    ///
    /// The scan starts at `x + direction` and stops after one full lap
    /// (`width` cells). The starting cell itself is the last one checked, so
    /// a vehicle alone on its lane sees `width - 1`. A lap that finds nothing
    /// is capped at `width - 1` as well.
    pub fn gap(&self, lane: usize, x: usize, direction: Direction) -> usize {
        let sign = direction.sign();
        for offset in 1..=self.width {
            let probe = self.wrap(x as i64 + sign * offset as i64);
            if !self.is_empty(lane, probe) {
                return offset - 1;
            }
        }
        self.width - 1
    }

    /// Every occupied cell with its vehicle, lane by lane in ascending x
    pub fn occupied_cells(&self) -> impl Iterator<Item = (Cell, VehicleId)> + '_ {
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            cell.map(|vehicle| (Cell::new(i / self.width, i % self.width), vehicle))
        })
    }
}
