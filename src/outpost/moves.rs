//! Outpost moves

use super::board::{Edge, NodeId, Resource, TileId};
use crate::engine::{LegalMove, MoveValue, PlayerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    Roll,
    BuildSettlement(NodeId),
    BuildRoad(Edge),
    BuildCity(NodeId),
    BuyDevelopmentCard,
    PlayKnightCard,
    MoveRobber(TileId),
    MaritimeTrade { give: Resource, get: Resource },
    EndTurn,
}

impl MoveKind {
    pub fn token(&self) -> &'static str {
        match self {
            MoveKind::Roll => "ROLL",
            MoveKind::BuildSettlement(_) => "BUILD_SETTLEMENT",
            MoveKind::BuildRoad(_) => "BUILD_ROAD",
            MoveKind::BuildCity(_) => "BUILD_CITY",
            MoveKind::BuyDevelopmentCard => "BUY_DEVELOPMENT_CARD",
            MoveKind::PlayKnightCard => "PLAY_KNIGHT_CARD",
            MoveKind::MoveRobber(_) => "MOVE_ROBBER",
            MoveKind::MaritimeTrade { .. } => "MARITIME_TRADE",
            MoveKind::EndTurn => "END_TURN",
        }
    }
}

fn index(n: usize) -> MoveValue {
    MoveValue::Int(i64::try_from(n).unwrap_or(i64::MAX))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutpostMove {
    pub color: PlayerId,
    pub kind: MoveKind,
}

impl OutpostMove {
    pub fn new(color: &str, kind: MoveKind) -> Self {
        Self {
            color: color.to_string(),
            kind,
        }
    }
}

impl LegalMove for OutpostMove {
    fn action_type(&self) -> String {
        format!("ActionType.{}", self.kind.token())
    }

    fn value(&self) -> Option<MoveValue> {
        match self.kind {
            MoveKind::BuildSettlement(node) | MoveKind::BuildCity(node) => Some(index(node)),
            MoveKind::MoveRobber(tile) => Some(index(tile)),
            MoveKind::BuildRoad((a, b)) => Some(MoveValue::Tuple(vec![index(a), index(b)])),
            MoveKind::MaritimeTrade { give, get } => Some(MoveValue::Tuple(vec![
                MoveValue::Text(give.name().to_string()),
                MoveValue::Text(get.name().to_string()),
            ])),
            MoveKind::Roll | MoveKind::BuyDevelopmentCard | MoveKind::PlayKnightCard | MoveKind::EndTurn => None,
        }
    }

    fn actor(&self) -> Option<PlayerId> {
        Some(self.color.clone())
    }

    fn describe(&self) -> String {
        match self.kind {
            MoveKind::Roll => "Roll the dice".to_string(),
            MoveKind::BuildSettlement(node) => format!("Build a settlement at node {node}"),
            MoveKind::BuildRoad((a, b)) => format!("Build a road between nodes {a} and {b}"),
            MoveKind::BuildCity(node) => format!("Upgrade the settlement at node {node} to a city"),
            MoveKind::BuyDevelopmentCard => "Buy a development card".to_string(),
            MoveKind::PlayKnightCard => "Play a knight card and move the robber".to_string(),
            MoveKind::MoveRobber(tile) => format!("Move the robber to tile {tile}"),
            MoveKind::MaritimeTrade { give, get } => {
                format!("Trade 4 {} for 1 {}", give.name(), get.name())
            }
            MoveKind::EndTurn => "End your turn".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{ActionMapper, IdStyle};

    #[test]
    fn test_descriptive_ids() {
        let moves = vec![
            OutpostMove::new("RED", MoveKind::BuildRoad((3, 4))),
            OutpostMove::new(
                "RED",
                MoveKind::MaritimeTrade {
                    give: Resource::Wood,
                    get: Resource::Ore,
                },
            ),
            OutpostMove::new("RED", MoveKind::BuildSettlement(9)),
            OutpostMove::new("RED", MoveKind::EndTurn),
        ];
        let mut mapper = ActionMapper::new(IdStyle::Descriptive);
        mapper.set_moves(moves);

        assert_eq!(
            mapper.list_ids(),
            &["build_road_3_4", "maritime_trade_wood_ore", "build_settlement_9", "end_turn"]
        );
    }

    #[test]
    fn test_describe() {
        let mv = OutpostMove::new("BLUE", MoveKind::MoveRobber(6));
        assert_eq!(mv.describe(), "Move the robber to tile 6");
        assert_eq!(mv.actor().as_deref(), Some("BLUE"));
    }
}
