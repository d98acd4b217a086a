use derive_more::Display;
use derive_more::From;

pub type Idx = u16;
pub type Day = u32;
pub type WorkUnits = f64;
pub type Cost = f64;
pub type Meter = f64;
pub type MachineCount = u32;

/// Most entities of one kind (blocks, machines, landings, roles, systems) a problem may hold.
pub const MAX_ENTITIES: usize = Idx::MAX as usize + 1;

/// Most shifts a day may be divided into.
pub const MAX_SHIFTS: usize = u8::MAX as usize + 1;

/// Production below this amount counts as "no work left".
pub const WORK_EPSILON: WorkUnits = 1e-9;

#[derive(Display, From, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[display(fmt = "blk{}", _0)]
pub struct BlockIdx(pub Idx);

#[derive(Display, From, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[display(fmt = "mach{}", _0)]
pub struct MachineIdx(pub Idx);

#[derive(Display, From, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[display(fmt = "land{}", _0)]
pub struct LandingIdx(pub Idx);

#[derive(Display, From, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[display(fmt = "sys{}", _0)]
pub struct SystemIdx(pub Idx);

#[derive(Display, From, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[display(fmt = "role{}", _0)]
pub struct RoleIdx(pub Idx);

/// Position of a shift in the declared shift order of a day.
#[derive(Display, From, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShiftIdx(pub u8);

impl BlockIdx {
    pub fn new(idx: usize) -> BlockIdx {
        BlockIdx(idx as Idx)
    }
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

impl MachineIdx {
    pub fn new(idx: usize) -> MachineIdx {
        MachineIdx(idx as Idx)
    }
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

impl LandingIdx {
    pub fn new(idx: usize) -> LandingIdx {
        LandingIdx(idx as Idx)
    }
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

impl SystemIdx {
    pub fn new(idx: usize) -> SystemIdx {
        SystemIdx(idx as Idx)
    }
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

impl RoleIdx {
    pub fn new(idx: usize) -> RoleIdx {
        RoleIdx(idx as Idx)
    }
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

impl ShiftIdx {
    pub fn new(idx: usize) -> ShiftIdx {
        ShiftIdx(idx as u8)
    }
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

/// The atomic scheduling unit. Ordered by day, then by shift declaration order.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[display(fmt = "d{}/s{}", day, shift)]
pub struct ShiftKey {
    pub day: Day,
    pub shift: ShiftIdx,
}

impl ShiftKey {
    pub fn new(day: Day, shift: ShiftIdx) -> ShiftKey {
        ShiftKey { day, shift }
    }

    pub const MIN: ShiftKey = ShiftKey {
        day: 0,
        shift: ShiftIdx(0),
    };

    pub const MAX: ShiftKey = ShiftKey {
        day: Day::MAX,
        shift: ShiftIdx(u8::MAX),
    };
}
