//! Outpost: a small settlement-building game
//!
//! A reduced cousin of the classic resource-trading board game, used as the
//! reference engine for the binary and for end-to-end tests. The board is a
//! square grid; players place two settlements and roads in a snake-order
//! setup, then roll for resources, build, buy development cards, move the
//! robber and trade 4:1 with the bank until someone reaches the target.

mod board;
mod moves;

pub use board::{Board, Edge, NodeId, Resource, Tile, TileId, RESOURCES};
pub use moves::{MoveKind, OutpostMove};

use crate::engine::{
    BoardLayout, GameEngine, GameError, GameState, Holdings, LegalMove, Placement, PlayerId, Standing,
};
use board::longest_trail;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

pub const COLORS: [&str; 4] = ["RED", "BLUE", "WHITE", "ORANGE"];

const SETTLEMENT_SUPPLY: u32 = 5;
const CITY_SUPPLY: u32 = 4;
const ROAD_SUPPLY: u32 = 15;

// Costs indexed like RESOURCES: wood, brick, sheep, wheat, ore
const ROAD_COST: [u32; 5] = [1, 1, 0, 0, 0];
const SETTLEMENT_COST: [u32; 5] = [1, 1, 1, 1, 0];
const CITY_COST: [u32; 5] = [0, 0, 0, 2, 3];
const DEVELOPMENT_CARD_COST: [u32; 5] = [0, 0, 1, 1, 1];

const TRADE_RATE: u32 = 4;
const HAND_LIMIT: u32 = 7;
const KNIGHT_CARDS: usize = 14;
const VICTORY_POINT_CARDS: usize = 5;
const LONGEST_ROAD_MIN: u32 = 5;
const LARGEST_ARMY_MIN: u32 = 3;
const AWARD_POINTS: u32 = 2;
const HISTORY_KEPT: usize = 50;

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[derive(Debug, Clone)]
pub struct OutpostConfig {
    /// Seats in turn order, 2 to 4 distinct colours
    pub colors: Vec<PlayerId>,
    pub target_points: u32,
    /// Tiles per board side
    pub board_size: usize,
    /// Seeds the board layout, dice and card draws
    pub seed: Option<u64>,
}

impl Default for OutpostConfig {
    fn default() -> Self {
        Self {
            colors: COLORS.iter().map(ToString::to_string).collect(),
            target_points: 10,
            board_size: 5,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DevelopmentCard {
    Knight,
    VictoryPoint,
}

#[derive(Debug, Clone, Default)]
struct Seat {
    color: PlayerId,
    resources: [u32; 5],
    knights: u32,
    /// Knights bought this turn, not yet playable
    fresh_knights: u32,
    victory_cards: u32,
    knights_played: u32,
    settlements: Vec<NodeId>,
    cities: Vec<NodeId>,
    roads: Vec<Edge>,
}

impl Seat {
    fn new(color: &str) -> Self {
        Self {
            color: color.to_string(),
            ..Default::default()
        }
    }

    fn card_count(&self) -> u32 {
        self.resources.iter().sum()
    }

    fn can_afford(&self, cost: &[u32; 5]) -> bool {
        self.resources.iter().zip(cost).all(|(have, need)| have >= need)
    }

    fn pay(&mut self, cost: &[u32; 5]) {
        for (have, need) in self.resources.iter_mut().zip(cost) {
            *have = have.saturating_sub(*need);
        }
    }

    fn building_points(&self) -> u32 {
        count(self.settlements.len()) + 2 * count(self.cities.len())
    }

    fn touches_road(&self, node: NodeId) -> bool {
        self.roads.iter().any(|&(a, b)| a == node || b == node)
    }

    /// Remove one uniformly random resource card
    fn take_random(&mut self, rng: &mut impl Rng) -> Option<Resource> {
        let total = self.card_count();
        if total == 0 {
            return None;
        }
        let mut pick = rng.gen_range(0..total);
        for resource in RESOURCES {
            let held = self.resources[resource.index()];
            if pick < held {
                self.resources[resource.index()] -= 1;
                return Some(resource);
            }
            pick -= held;
        }
        None
    }
}

/// Snapshot of an Outpost game, shared read-only with decision owners
#[derive(Debug, Clone)]
pub struct OutpostState {
    game_id: String,
    turn: u64,
    board: Arc<Board>,
    seats: Vec<Seat>,
    robber: TileId,
    deck: Vec<DevelopmentCard>,
    longest_road: Option<usize>,
    largest_army: Option<usize>,
    history: VecDeque<String>,
}

impl OutpostState {
    fn seat_index(&self, player: &str) -> Option<usize> {
        self.seats.iter().position(|s| s.color == player)
    }

    fn public_points(&self, index: usize) -> u32 {
        let Some(seat) = self.seats.get(index) else {
            return 0;
        };
        let mut points = seat.building_points();
        if self.longest_road == Some(index) {
            points += AWARD_POINTS;
        }
        if self.largest_army == Some(index) {
            points += AWARD_POINTS;
        }
        points
    }

    fn actual_points(&self, index: usize) -> u32 {
        self.public_points(index) + self.seats.get(index).map_or(0, |s| s.victory_cards)
    }

    /// Owner of the building at `node`, and whether it is a city
    fn building_at(&self, node: NodeId) -> Option<(usize, bool)> {
        self.seats.iter().enumerate().find_map(|(i, seat)| {
            if seat.settlements.contains(&node) {
                Some((i, false))
            } else if seat.cities.contains(&node) {
                Some((i, true))
            } else {
                None
            }
        })
    }

    fn road_taken(&self, road: Edge) -> bool {
        self.seats.iter().any(|s| s.roads.contains(&road))
    }

    /// Empty node with no building on any neighbour
    fn node_open(&self, node: NodeId) -> bool {
        self.building_at(node).is_none()
            && self
                .board
                .neighbors(node)
                .iter()
                .all(|&n| self.building_at(n).is_none())
    }

    /// Whether seat `index` can extend its network through `node`
    fn reaches(&self, index: usize, node: NodeId) -> bool {
        match self.building_at(node) {
            Some((owner, _)) => owner == index,
            None => self.seats.get(index).is_some_and(|s| s.touches_road(node)),
        }
    }

    fn record(&mut self, entry: String) {
        if self.history.len() == HISTORY_KEPT {
            self.history.pop_front();
        }
        self.history.push_back(entry);
    }
}

impl GameState for OutpostState {
    fn game_id(&self) -> String {
        self.game_id.clone()
    }

    fn turn_number(&self) -> u64 {
        self.turn
    }

    fn players(&self) -> Vec<PlayerId> {
        self.seats.iter().map(|s| s.color.clone()).collect()
    }

    fn holdings(&self, player: &str) -> Holdings {
        let Some(seat) = self.seat_index(player).and_then(|i| self.seats.get(i)) else {
            return Holdings::default();
        };
        Holdings {
            resources: RESOURCES
                .iter()
                .map(|r| (r.name().to_string(), seat.resources[r.index()]))
                .collect(),
            development_cards: BTreeMap::from([
                ("knight".to_string(), seat.knights),
                ("victory_point".to_string(), seat.victory_cards),
            ]),
            hidden_victory_points: seat.victory_cards,
        }
    }

    fn standing(&self, player: &str) -> Standing {
        let Some(index) = self.seat_index(player) else {
            return Standing::default();
        };
        let seat = &self.seats[index];
        let settlements = count(seat.settlements.len());
        let cities = count(seat.cities.len());
        let roads = count(seat.roads.len());

        let mut badges = Vec::new();
        if self.longest_road == Some(index) {
            badges.push("longest_road".to_string());
        }
        if self.largest_army == Some(index) {
            badges.push("largest_army".to_string());
        }

        Standing {
            public_victory_points: self.public_points(index),
            built: BTreeMap::from([
                ("settlement".to_string(), settlements),
                ("city".to_string(), cities),
                ("road".to_string(), roads),
            ]),
            available: BTreeMap::from([
                ("settlement".to_string(), SETTLEMENT_SUPPLY.saturating_sub(settlements)),
                ("city".to_string(), CITY_SUPPLY.saturating_sub(cities)),
                ("road".to_string(), ROAD_SUPPLY.saturating_sub(roads)),
            ]),
            badges,
            knights_played: seat.knights_played,
            longest_road_length: longest_trail(&seat.roads),
        }
    }

    fn development_cards_remaining(&self) -> Option<u32> {
        Some(count(self.deck.len()))
    }

    fn board(&self) -> Option<BoardLayout> {
        let place = |location: String, owner: &PlayerId| Placement {
            location,
            owner: owner.clone(),
        };
        let mut layout = BoardLayout {
            robber_tile: Some(self.robber.to_string()),
            ..Default::default()
        };
        for seat in &self.seats {
            layout
                .settlements
                .extend(seat.settlements.iter().map(|n| place(n.to_string(), &seat.color)));
            layout
                .cities
                .extend(seat.cities.iter().map(|n| place(n.to_string(), &seat.color)));
            layout
                .roads
                .extend(seat.roads.iter().map(|(a, b)| place(format!("({a}, {b})"), &seat.color)));
        }
        Some(layout)
    }

    fn recent_actions(&self, limit: usize) -> Option<Vec<String>> {
        let skip = self.history.len().saturating_sub(limit);
        Some(self.history.iter().skip(skip).cloned().collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    PlaceSettlement,
    PlaceRoad(NodeId),
    Roll,
    MoveRobber,
    Main,
}

pub struct OutpostGame {
    state: OutpostState,
    phase: Phase,
    current: usize,
    setup_order: Vec<usize>,
    setup_step: usize,
    rolled: bool,
    played_development_card: bool,
    target_points: u32,
    winner: Option<PlayerId>,
    rng: StdRng,
}

impl OutpostGame {
    pub fn new(config: &OutpostConfig) -> Result<Self, GameError> {
        let seats = config.colors.len();
        let mut distinct = config.colors.clone();
        distinct.sort();
        distinct.dedup();
        if !(2..=4).contains(&seats) || distinct.len() != seats {
            return Err(GameError::Engine(format!(
                "outpost needs 2 to 4 distinct colours, got {:?}",
                config.colors
            )));
        }

        let mut rng = config
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        let board = Board::grid(config.board_size, &mut rng);
        let robber = board.desert();

        let mut deck: Vec<DevelopmentCard> = std::iter::repeat(DevelopmentCard::Knight)
            .take(KNIGHT_CARDS)
            .chain(std::iter::repeat(DevelopmentCard::VictoryPoint).take(VICTORY_POINT_CARDS))
            .collect();
        deck.shuffle(&mut rng);

        let setup_order = (0..seats).chain((0..seats).rev()).collect();
        let game_id = uuid::Uuid::new_v4().to_string();
        tracing::debug!(game_id = %game_id, seats, board_size = config.board_size, "New outpost game");

        Ok(Self {
            state: OutpostState {
                game_id,
                turn: 0,
                board: Arc::new(board),
                seats: config.colors.iter().map(|c| Seat::new(c)).collect(),
                robber,
                deck,
                longest_road: None,
                largest_army: None,
                history: VecDeque::new(),
            },
            phase: Phase::PlaceSettlement,
            current: 0,
            setup_order,
            setup_step: 0,
            rolled: false,
            played_development_card: false,
            target_points: config.target_points,
            winner: None,
            rng,
        })
    }

    pub fn target_points(&self) -> u32 {
        self.target_points
    }

    pub fn board(&self) -> &Board {
        &self.state.board
    }

    fn seat(&self) -> &Seat {
        &self.state.seats[self.current]
    }

    fn seat_mut(&mut self) -> &mut Seat {
        &mut self.state.seats[self.current]
    }

    fn can_play_knight(&self) -> bool {
        let seat = self.seat();
        !self.played_development_card && seat.knights > seat.fresh_knights
    }

    fn main_moves(&self, player: &str) -> Vec<OutpostMove> {
        let state = &self.state;
        let seat = self.seat();
        let mv = |kind| OutpostMove::new(player, kind);
        let mut moves = Vec::new();

        if count(seat.roads.len()) < ROAD_SUPPLY && seat.can_afford(&ROAD_COST) {
            moves.extend(
                state
                    .board
                    .edges()
                    .iter()
                    .filter(|&&(a, b)| {
                        !state.road_taken((a, b))
                            && (state.reaches(self.current, a) || state.reaches(self.current, b))
                    })
                    .map(|&road| mv(MoveKind::BuildRoad(road))),
            );
        }

        if count(seat.settlements.len()) < SETTLEMENT_SUPPLY && seat.can_afford(&SETTLEMENT_COST) {
            moves.extend(
                (0..state.board.node_count())
                    .filter(|&n| state.node_open(n) && seat.touches_road(n))
                    .map(|n| mv(MoveKind::BuildSettlement(n))),
            );
        }

        if count(seat.cities.len()) < CITY_SUPPLY && seat.can_afford(&CITY_COST) {
            moves.extend(seat.settlements.iter().map(|&n| mv(MoveKind::BuildCity(n))));
        }

        if !state.deck.is_empty() && seat.can_afford(&DEVELOPMENT_CARD_COST) {
            moves.push(mv(MoveKind::BuyDevelopmentCard));
        }

        if self.can_play_knight() {
            moves.push(mv(MoveKind::PlayKnightCard));
        }

        for give in RESOURCES {
            if seat.resources[give.index()] >= TRADE_RATE {
                moves.extend(
                    RESOURCES
                        .iter()
                        .filter(|&&get| get != give)
                        .map(|&get| mv(MoveKind::MaritimeTrade { give, get })),
                );
            }
        }

        moves.push(mv(MoveKind::EndTurn));
        moves
    }

    fn roll(&mut self) {
        let total = self.rng.gen_range(1..=6) + self.rng.gen_range(1..=6);
        self.rolled = true;
        let color = self.seat().color.clone();
        self.state.record(format!("{color}: rolled {total}"));
        tracing::debug!(player = %color, total, "Dice rolled");

        if total == 7 {
            for seat in &mut self.state.seats {
                let held = seat.card_count();
                if held > HAND_LIMIT {
                    for _ in 0..held / 2 {
                        seat.take_random(&mut self.rng);
                    }
                }
            }
            self.phase = Phase::MoveRobber;
            return;
        }

        let mut gains = Vec::new();
        for (id, tile) in self.state.board.tiles().iter().enumerate() {
            let (Some(resource), Some(number)) = (tile.resource, tile.number) else {
                continue;
            };
            if u32::from(number) != total || id == self.state.robber {
                continue;
            }
            for &corner in &tile.corners {
                if let Some((owner, city)) = self.state.building_at(corner) {
                    gains.push((owner, resource, if city { 2 } else { 1 }));
                }
            }
        }
        for (owner, resource, amount) in gains {
            self.state.seats[owner].resources[resource.index()] += amount;
        }
        self.phase = Phase::Main;
    }

    fn move_robber(&mut self, tile: TileId) {
        self.state.robber = tile;
        let victims: Vec<usize> = self
            .state
            .board
            .tiles()
            .get(tile)
            .map(|t| {
                let mut owners: Vec<usize> = t
                    .corners
                    .iter()
                    .filter_map(|&n| self.state.building_at(n).map(|(owner, _)| owner))
                    .filter(|&owner| owner != self.current && self.state.seats[owner].card_count() > 0)
                    .collect();
                owners.sort_unstable();
                owners.dedup();
                owners
            })
            .unwrap_or_default();

        if let Some(&victim) = victims.choose(&mut self.rng) {
            if let Some(stolen) = self.state.seats[victim].take_random(&mut self.rng) {
                self.seat_mut().resources[stolen.index()] += 1;
            }
        }
        self.phase = if self.rolled { Phase::Main } else { Phase::Roll };
    }

    fn draw_development_card(&mut self) {
        let Some(card) = self.state.deck.pop() else {
            return;
        };
        let seat = self.seat_mut();
        match card {
            DevelopmentCard::Knight => {
                seat.knights += 1;
                seat.fresh_knights += 1;
            }
            DevelopmentCard::VictoryPoint => seat.victory_cards += 1,
        }
    }

    /// Longest road moves only to a strictly longer network
    fn update_longest_road(&mut self) {
        let length = longest_trail(&self.seat().roads);
        if length < LONGEST_ROAD_MIN {
            return;
        }
        let beaten = match self.state.longest_road {
            None => true,
            Some(holder) if holder == self.current => false,
            Some(holder) => length > longest_trail(&self.state.seats[holder].roads),
        };
        if beaten {
            self.state.longest_road = Some(self.current);
        }
    }

    fn update_largest_army(&mut self) {
        let knights = self.seat().knights_played;
        if knights < LARGEST_ARMY_MIN {
            return;
        }
        let beaten = match self.state.largest_army {
            None => true,
            Some(holder) if holder == self.current => false,
            Some(holder) => knights > self.state.seats[holder].knights_played,
        };
        if beaten {
            self.state.largest_army = Some(self.current);
        }
    }

    fn place_settlement(&mut self, node: NodeId) {
        if self.phase == Phase::PlaceSettlement {
            // Second setup settlement collects from its tiles
            if self.setup_step >= self.state.seats.len() {
                let produced: Vec<Resource> = self
                    .state
                    .board
                    .tiles_at(node)
                    .iter()
                    .filter_map(|&t| self.state.board.tiles().get(t).and_then(|tile| tile.resource))
                    .collect();
                for resource in produced {
                    self.seat_mut().resources[resource.index()] += 1;
                }
            }
            self.phase = Phase::PlaceRoad(node);
        } else {
            self.seat_mut().pay(&SETTLEMENT_COST);
        }
        self.seat_mut().settlements.push(node);
    }

    fn place_road(&mut self, road: Edge) {
        let setup = matches!(self.phase, Phase::PlaceRoad(_));
        if !setup {
            self.seat_mut().pay(&ROAD_COST);
        }
        self.seat_mut().roads.push(road);
        self.update_longest_road();

        if setup {
            self.setup_step += 1;
            self.state.turn += 1;
            match self.setup_order.get(self.setup_step) {
                Some(&next) => {
                    self.current = next;
                    self.phase = Phase::PlaceSettlement;
                }
                None => {
                    self.current = 0;
                    self.phase = Phase::Roll;
                }
            }
        }
    }

    fn end_turn(&mut self) {
        for seat in &mut self.state.seats {
            seat.fresh_knights = 0;
        }
        self.current = (self.current + 1) % self.state.seats.len();
        self.state.turn += 1;
        self.rolled = false;
        self.played_development_card = false;
        self.phase = Phase::Roll;
    }

    fn check_winner(&mut self, index: usize) {
        let points = self.state.actual_points(index);
        if points >= self.target_points {
            let color = self.state.seats[index].color.clone();
            tracing::info!(game_id = %self.state.game_id, winner = %color, points, "Outpost game won");
            self.winner = Some(color);
        }
    }
}

impl GameEngine for OutpostGame {
    type Move = OutpostMove;
    type State = OutpostState;

    fn state(&self) -> Arc<OutpostState> {
        Arc::new(self.state.clone())
    }

    fn current_player(&self) -> PlayerId {
        self.seat().color.clone()
    }

    fn turn_number(&self) -> u64 {
        self.state.turn
    }

    fn legal_moves(&self, player: &str) -> Vec<OutpostMove> {
        if self.winner.is_some() || self.seat().color != player {
            return Vec::new();
        }
        let state = &self.state;
        let mv = |kind| OutpostMove::new(player, kind);

        match self.phase {
            Phase::PlaceSettlement => (0..state.board.node_count())
                .filter(|&n| state.node_open(n))
                .map(|n| mv(MoveKind::BuildSettlement(n)))
                .collect(),
            Phase::PlaceRoad(node) => state
                .board
                .edges_at(node)
                .filter(|&road| !state.road_taken(road))
                .map(|road| mv(MoveKind::BuildRoad(road)))
                .collect(),
            Phase::Roll => {
                let mut moves = vec![mv(MoveKind::Roll)];
                if self.can_play_knight() {
                    moves.push(mv(MoveKind::PlayKnightCard));
                }
                moves
            }
            Phase::MoveRobber => (0..state.board.tiles().len())
                .filter(|&t| t != state.robber)
                .map(|t| mv(MoveKind::MoveRobber(t)))
                .collect(),
            Phase::Main => self.main_moves(player),
        }
    }

    fn execute(&mut self, mv: &OutpostMove) -> Result<(), GameError> {
        if self.winner.is_some() {
            return Err(GameError::Engine("game is already over".to_string()));
        }
        if self.state.seat_index(&mv.color).is_none() {
            return Err(GameError::UnknownSeat(mv.color.clone()));
        }
        if !self.legal_moves(&mv.color).contains(mv) {
            return Err(GameError::IllegalMove {
                player: mv.color.clone(),
                description: mv.describe(),
            });
        }

        // Setup placements advance the seat, so remember who moved
        let mover = self.current;
        if mv.kind != MoveKind::Roll {
            self.state.record(format!("{}: {}", mv.color, mv.describe()));
        }

        match mv.kind {
            MoveKind::Roll => self.roll(),
            MoveKind::BuildSettlement(node) => self.place_settlement(node),
            MoveKind::BuildRoad(road) => self.place_road(road),
            MoveKind::BuildCity(node) => {
                let seat = self.seat_mut();
                seat.pay(&CITY_COST);
                seat.settlements.retain(|&n| n != node);
                seat.cities.push(node);
            }
            MoveKind::BuyDevelopmentCard => {
                self.seat_mut().pay(&DEVELOPMENT_CARD_COST);
                self.draw_development_card();
            }
            MoveKind::PlayKnightCard => {
                let seat = self.seat_mut();
                seat.knights -= 1;
                seat.knights_played += 1;
                self.played_development_card = true;
                self.update_largest_army();
                self.phase = Phase::MoveRobber;
            }
            MoveKind::MoveRobber(tile) => self.move_robber(tile),
            MoveKind::MaritimeTrade { give, get } => {
                let seat = self.seat_mut();
                seat.resources[give.index()] -= TRADE_RATE;
                seat.resources[get.index()] += 1;
            }
            MoveKind::EndTurn => self.end_turn(),
        }

        self.check_winner(mover);
        Ok(())
    }

    fn winner(&self) -> Option<PlayerId> {
        self.winner.clone()
    }

    fn score(&self, player: &str) -> u32 {
        self.state
            .seat_index(player)
            .map_or(0, |i| self.state.actual_points(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(colors: &[&str]) -> OutpostGame {
        OutpostGame::new(&OutpostConfig {
            colors: colors.iter().map(ToString::to_string).collect(),
            seed: Some(42),
            ..Default::default()
        })
        .unwrap()
    }

    /// Play the setup by always taking the first legal move
    fn finish_setup(game: &mut OutpostGame) {
        while matches!(game.phase, Phase::PlaceSettlement | Phase::PlaceRoad(_)) {
            let player = game.current_player();
            let mv = game.legal_moves(&player).remove(0);
            game.execute(&mv).unwrap();
        }
    }

    #[test]
    fn test_rejects_bad_seating() {
        let one = OutpostConfig {
            colors: vec!["RED".to_string()],
            ..Default::default()
        };
        assert!(OutpostGame::new(&one).is_err());

        let duplicate = OutpostConfig {
            colors: vec!["RED".to_string(), "RED".to_string()],
            ..Default::default()
        };
        assert!(OutpostGame::new(&duplicate).is_err());
    }

    #[test]
    fn test_only_current_seat_has_moves() {
        let game = game(&["RED", "BLUE"]);
        assert!(!game.legal_moves("RED").is_empty());
        assert!(game.legal_moves("BLUE").is_empty());
        assert!(game
            .legal_moves("RED")
            .iter()
            .all(|m| matches!(m.kind, MoveKind::BuildSettlement(_))));
    }

    #[test]
    fn test_setup_runs_in_snake_order() {
        let mut game = game(&["RED", "BLUE", "WHITE"]);
        let mut order = Vec::new();
        while matches!(game.phase, Phase::PlaceSettlement | Phase::PlaceRoad(_)) {
            let player = game.current_player();
            if game.phase == Phase::PlaceSettlement {
                order.push(player.clone());
            }
            let mv = game.legal_moves(&player).remove(0);
            game.execute(&mv).unwrap();
        }

        assert_eq!(order, ["RED", "BLUE", "WHITE", "WHITE", "BLUE", "RED"]);
        assert_eq!(game.current_player(), "RED");
        assert_eq!(game.turn_number(), 6);
        let moves = game.legal_moves("RED");
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].kind, MoveKind::Roll);
    }

    #[test]
    fn test_second_settlement_collects_resources() {
        let mut game = game(&["RED", "BLUE"]);
        finish_setup(&mut game);

        for seat in &game.state.seats {
            let second = seat.settlements[1];
            let expected = game
                .board()
                .tiles_at(second)
                .iter()
                .filter(|&&t| game.board().tiles()[t].resource.is_some())
                .count();
            assert_eq!(seat.card_count(), count(expected));
        }
    }

    #[test]
    fn test_setup_respects_distance_rule() {
        let mut game = game(&["RED", "BLUE", "WHITE", "ORANGE"]);
        finish_setup(&mut game);

        let nodes: Vec<NodeId> = game.state.seats.iter().flat_map(|s| s.settlements.clone()).collect();
        assert_eq!(nodes.len(), 8);
        for &a in &nodes {
            for &b in game.board().neighbors(a) {
                assert!(!nodes.contains(&b), "settlements at {a} and {b} are adjacent");
            }
        }
    }

    #[test]
    fn test_illegal_move_rejected() {
        let mut game = game(&["RED", "BLUE"]);
        let err = game
            .execute(&OutpostMove::new("BLUE", MoveKind::BuildSettlement(0)))
            .unwrap_err();
        assert!(matches!(err, GameError::IllegalMove { .. }));

        let err = game
            .execute(&OutpostMove::new("GREEN", MoveKind::EndTurn))
            .unwrap_err();
        assert!(matches!(err, GameError::UnknownSeat(_)));
    }

    #[test]
    fn test_city_upgrade_scores() {
        let mut game = game(&["RED", "BLUE"]);
        finish_setup(&mut game);
        game.phase = Phase::Main;
        game.state.seats[0].resources = [0, 0, 0, 2, 3];
        let node = game.state.seats[0].settlements[0];
        let before = game.score("RED");

        let city = OutpostMove::new("RED", MoveKind::BuildCity(node));
        assert!(game.legal_moves("RED").contains(&city));
        game.execute(&city).unwrap();

        assert_eq!(game.score("RED"), before + 1);
        assert_eq!(game.state.seats[0].card_count(), 0);
        assert_eq!(game.state().standing("RED").built["city"], 1);
    }

    #[test]
    fn test_maritime_trade() {
        let mut game = game(&["RED", "BLUE"]);
        finish_setup(&mut game);
        game.phase = Phase::Main;
        game.state.seats[0].resources = [4, 0, 0, 0, 0];

        let trades: Vec<_> = game
            .legal_moves("RED")
            .into_iter()
            .filter(|m| matches!(m.kind, MoveKind::MaritimeTrade { .. }))
            .collect();
        assert_eq!(trades.len(), 4);

        let ore = OutpostMove::new(
            "RED",
            MoveKind::MaritimeTrade {
                give: Resource::Wood,
                get: Resource::Ore,
            },
        );
        game.execute(&ore).unwrap();
        assert_eq!(game.state.seats[0].resources, [0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_knight_before_roll_returns_to_roll() {
        let mut game = game(&["RED", "BLUE"]);
        finish_setup(&mut game);
        game.state.seats[0].knights = 1;

        let knight = OutpostMove::new("RED", MoveKind::PlayKnightCard);
        assert!(game.legal_moves("RED").contains(&knight));
        game.execute(&knight).unwrap();
        assert_eq!(game.phase, Phase::MoveRobber);

        let target = (game.state.robber + 1) % game.board().tiles().len();
        game.execute(&OutpostMove::new("RED", MoveKind::MoveRobber(target))).unwrap();

        assert_eq!(game.state.robber, target);
        assert_eq!(game.phase, Phase::Roll);
        assert!(!game.legal_moves("RED").contains(&knight));
    }

    #[test]
    fn test_fresh_knight_not_playable() {
        let mut game = game(&["RED", "BLUE"]);
        finish_setup(&mut game);
        game.phase = Phase::Main;
        game.state.seats[0].knights = 1;
        game.state.seats[0].fresh_knights = 1;

        assert!(!game.legal_moves("RED").iter().any(|m| m.kind == MoveKind::PlayKnightCard));
    }

    #[test]
    fn test_largest_army_award() {
        let mut game = game(&["RED", "BLUE"]);
        finish_setup(&mut game);
        game.state.seats[0].knights_played = 3;
        game.update_largest_army();
        assert_eq!(game.state.largest_army, Some(0));
        assert_eq!(game.state().standing("RED").badges, ["largest_army"]);

        // A tie does not take the award
        game.current = 1;
        game.state.seats[1].knights_played = 3;
        game.update_largest_army();
        assert_eq!(game.state.largest_army, Some(0));
    }

    #[test]
    fn test_winner_declared_at_target() {
        let mut game = OutpostGame::new(&OutpostConfig {
            colors: vec!["RED".to_string(), "BLUE".to_string()],
            target_points: 3,
            seed: Some(1),
            ..Default::default()
        })
        .unwrap();
        finish_setup(&mut game);
        game.phase = Phase::Main;
        game.state.seats[0].resources = [0, 0, 0, 2, 3];
        let node = game.state.seats[0].settlements[0];

        game.execute(&OutpostMove::new("RED", MoveKind::BuildCity(node))).unwrap();

        assert_eq!(game.winner().as_deref(), Some("RED"));
        assert!(game.legal_moves("RED").is_empty());
    }

    #[test]
    fn test_state_hides_nothing_it_should_show() {
        let mut game = game(&["RED", "BLUE"]);
        finish_setup(&mut game);
        game.state.seats[1].victory_cards = 1;
        let state = game.state();

        assert_eq!(state.players(), ["RED", "BLUE"]);
        assert_eq!(state.holdings("BLUE").hidden_victory_points, 1);
        assert_eq!(state.standing("BLUE").public_victory_points, 2);
        assert_eq!(game.score("BLUE"), 3);
        assert_eq!(state.development_cards_remaining(), Some(19));

        let layout = state.board().unwrap();
        assert_eq!(layout.settlements.len(), 4);
        assert_eq!(layout.roads.len(), 4);
        assert!(layout.roads[0].location.starts_with('('));

        let history = state.recent_actions(3).unwrap();
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_random_play_stays_consistent() {
        let mut game = game(&["RED", "BLUE", "WHITE"]);
        let mut rng = StdRng::seed_from_u64(9);

        for _ in 0..3000 {
            if game.winner().is_some() {
                break;
            }
            let player = game.current_player();
            let moves = game.legal_moves(&player);
            assert!(!moves.is_empty(), "{player} has no moves in {:?}", game.phase);
            let mv = moves.choose(&mut rng).unwrap().clone();
            assert_eq!(mv.actor().as_deref(), Some(player.as_str()));
            game.execute(&mv).unwrap();
        }

        let state = game.state();
        for player in state.players() {
            let standing = state.standing(&player);
            assert!(standing.built["settlement"] + standing.built["city"] >= 2);
            assert!(standing.built["road"] <= ROAD_SUPPLY);
        }
    }
}
