//! Consumable inventories carried by dumbbell racks and squat racks.

use gym_floor_core::StockItem;

/// Dumbbells a full rack holds.
pub(crate) const DUMBBELL_CAPACITY: u32 = 6;
/// Plates a fully loaded squat rack holds.
pub(crate) const PLATE_CAPACITY: u32 = 4;
/// Units lent out or handled in one move.
pub(crate) const PAIR: u32 = 2;

/// Read-only inventory figures of one piece of equipment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StockLevels {
    /// Kind of consumable tracked.
    pub item: StockItem,
    /// Units currently sitting in the rack.
    pub racked: u32,
    /// Units the rack holds when full.
    pub capacity: u32,
    /// Units lying on the floor next to the rack.
    pub floor: u32,
    /// Units held by the visitor currently using the equipment.
    pub borrowed: u32,
}

impl StockLevels {
    /// Units accounted for by this equipment across rack, floor and borrower.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.racked + self.floor + self.borrowed
    }
}

/// Inventory variants attached to equipment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Stock {
    None,
    Dumbbells(DumbbellStock),
    Plates(PlateStock),
}

impl Stock {
    pub(crate) fn levels(&self) -> Option<StockLevels> {
        match self {
            Self::None => None,
            Self::Dumbbells(stock) => Some(StockLevels {
                item: StockItem::Dumbbell,
                racked: stock.racked,
                capacity: DUMBBELL_CAPACITY,
                floor: stock.floor,
                borrowed: stock.borrowed,
            }),
            Self::Plates(stock) => Some(StockLevels {
                item: StockItem::Plate,
                racked: stock.racked,
                capacity: PLATE_CAPACITY,
                floor: stock.floor,
                borrowed: stock.loaded,
            }),
        }
    }
}

/// Dumbbells of one rack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct DumbbellStock {
    racked: u32,
    floor: u32,
    borrowed: u32,
}

impl DumbbellStock {
    pub(crate) const fn full() -> Self {
        Self {
            racked: DUMBBELL_CAPACITY,
            floor: 0,
            borrowed: 0,
        }
    }

    pub(crate) const fn racked(&self) -> u32 {
        self.racked
    }

    pub(crate) const fn space(&self) -> u32 {
        DUMBBELL_CAPACITY.saturating_sub(self.racked)
    }

    /// Hands a pair to the visitor starting a set.
    pub(crate) fn lend(&mut self) -> bool {
        if self.racked < PAIR {
            return false;
        }
        self.racked -= PAIR;
        self.borrowed += PAIR;
        true
    }

    /// Takes back whatever the visitor still holds.
    pub(crate) fn take_borrowed(&mut self) -> u32 {
        std::mem::take(&mut self.borrowed)
    }

    pub(crate) fn drop_on_floor(&mut self, count: u32) {
        self.floor += count;
    }

    /// Racks up to `count` dumbbells, returning how many fit.
    pub(crate) fn rack(&mut self, count: u32) -> u32 {
        let accepted = count.min(self.space());
        self.racked += accepted;
        accepted
    }

    /// Removes up to `max` dumbbells from the floor.
    pub(crate) fn pick_up(&mut self, max: u32) -> u32 {
        let taken = self.floor.min(max);
        self.floor -= taken;
        taken
    }

    pub(crate) const fn rack_frame(&self) -> u32 {
        match self.racked {
            r if r >= DUMBBELL_CAPACITY => 0,
            4 | 5 => 1,
            2 | 3 => 2,
            _ => 3,
        }
    }

    pub(crate) const fn floor_frame(&self) -> u32 {
        match self.floor {
            0..=2 => 0,
            3 | 4 => 1,
            _ => 2,
        }
    }
}

/// Weight plates of one squat rack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PlateStock {
    racked: u32,
    floor: u32,
    loaded: u32,
}

impl PlateStock {
    pub(crate) const fn full() -> Self {
        Self {
            racked: PLATE_CAPACITY,
            floor: 0,
            loaded: 0,
        }
    }

    pub(crate) const fn racked(&self) -> u32 {
        self.racked
    }

    /// Moves a pair of plates from the rack onto the bar.
    pub(crate) fn load(&mut self) -> bool {
        if self.racked < PAIR {
            return false;
        }
        self.racked -= PAIR;
        self.loaded += PAIR;
        true
    }

    /// Drops the plates on the bar, plus the rest of the rack when stripped.
    /// Returns the number of plates that hit the floor.
    pub(crate) fn unload(&mut self, stripped: bool) -> u32 {
        let mut dropped = std::mem::take(&mut self.loaded);
        if stripped {
            dropped += std::mem::take(&mut self.racked);
        }
        self.floor += dropped;
        dropped
    }

    pub(crate) fn pick_up(&mut self, max: u32) -> u32 {
        let taken = self.floor.min(max);
        self.floor -= taken;
        taken
    }

    pub(crate) fn rack(&mut self, count: u32) -> u32 {
        let space = PLATE_CAPACITY.saturating_sub(self.racked + self.loaded);
        let accepted = count.min(space);
        self.racked += accepted;
        accepted
    }

    pub(crate) const fn frame(&self) -> u32 {
        if self.floor > 0 {
            if self.racked == 0 {
                if self.floor >= PLATE_CAPACITY {
                    8
                } else {
                    9
                }
            } else {
                6
            }
        } else if self.racked >= PLATE_CAPACITY {
            0
        } else if self.racked == 0 {
            10
        } else {
            7
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lending_moves_a_pair_out_of_the_rack() {
        let mut stock = DumbbellStock::full();
        assert!(stock.lend());
        assert_eq!(stock.racked(), 4);
        assert_eq!(stock.rack_frame(), 1);
        assert_eq!(stock.take_borrowed(), 2);
        assert_eq!(stock.take_borrowed(), 0);
    }

    #[test]
    fn rack_frames_follow_the_count() {
        let mut stock = DumbbellStock::full();
        let mut frames = vec![stock.rack_frame()];
        while stock.lend() {
            frames.push(stock.rack_frame());
        }
        assert_eq!(frames, vec![0, 1, 2, 3]);
        assert!(!stock.lend());
    }

    #[test]
    fn racking_stops_at_capacity() {
        let mut stock = DumbbellStock::full();
        assert!(stock.lend());
        assert_eq!(stock.rack(6), 2);
        assert_eq!(stock.space(), 0);
    }

    #[test]
    fn floor_frame_grows_with_the_pile() {
        let mut stock = DumbbellStock::full();
        assert_eq!(stock.floor_frame(), 0);
        stock.drop_on_floor(4);
        assert_eq!(stock.floor_frame(), 1);
        stock.drop_on_floor(2);
        assert_eq!(stock.floor_frame(), 2);
        assert_eq!(stock.pick_up(PAIR), 2);
        assert_eq!(stock.floor_frame(), 1);
    }

    #[test]
    fn squat_rack_frames_track_the_plates() {
        let mut stock = PlateStock::full();
        assert_eq!(stock.frame(), 0);
        assert!(stock.load());
        assert_eq!(stock.unload(false), 2);
        assert_eq!(stock.frame(), 6);
        assert_eq!(stock.pick_up(PAIR), 2);
        assert_eq!(stock.frame(), 7);
        assert_eq!(stock.rack(PAIR), 2);
        assert_eq!(stock.frame(), 0);
    }

    #[test]
    fn stripped_squat_rack_drops_everything() {
        let mut stock = PlateStock::full();
        assert!(stock.load());
        assert_eq!(stock.unload(true), 4);
        assert_eq!(stock.frame(), 8);
        assert_eq!(stock.pick_up(PAIR), 2);
        assert_eq!(stock.frame(), 9);
        assert_eq!(stock.pick_up(PAIR), 2);
        assert_eq!(stock.frame(), 10);
    }

    #[test]
    fn levels_report_borrowed_units() {
        let mut plates = PlateStock::full();
        assert!(plates.load());
        let levels = Stock::Plates(plates).levels().expect("plates");
        assert_eq!(levels.borrowed, 2);
        assert_eq!(levels.total(), PLATE_CAPACITY);
        assert_eq!(Stock::None.levels(), None);
    }
}
