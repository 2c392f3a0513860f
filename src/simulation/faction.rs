use colored::Color as ColoredColor;
use serde::{Deserialize, Serialize};

use crate::simulation::Owner;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Player,
    Enemy,
}

impl Faction {
    pub fn name(&self) -> &'static str {
        match self {
            Faction::Player => "Player",
            Faction::Enemy => "Bot",
        }
    }

    pub fn owner(&self) -> Owner {
        match self {
            Faction::Player => Owner::Player,
            Faction::Enemy => Owner::Enemy,
        }
    }

    pub fn opponent(&self) -> Faction {
        match self {
            Faction::Player => Faction::Enemy,
            Faction::Enemy => Faction::Player,
        }
    }

    pub fn logging_color(&self) -> ColoredColor {
        match self {
            Faction::Player => ColoredColor::Blue,
            Faction::Enemy => ColoredColor::Red,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opponent_is_the_other_side() {
        assert_eq!(Faction::Player.opponent(), Faction::Enemy);
        assert_eq!(Faction::Enemy.opponent(), Faction::Player);
        assert_eq!(Faction::Enemy.opponent().owner(), Owner::Player);
    }
}
