//! System instruction for one decision
//!
//! Names the seat, the goal and the three tools, and lists the player's most
//! recent moves so the agent keeps some continuity across turns. Everything
//! else the agent learns by calling tools.

use crate::tools::{GET_STATE, GET_VALID_ACTIONS, SELECT_ACTION};
use std::fmt::Write;

/// Recent moves echoed into the prompt
pub const PROMPT_RECENT_MOVES: usize = 3;

/// Game-specific framing for the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameBrief {
    pub game_name: String,
    pub target_points: u32,
    pub strategy_tips: Vec<String>,
}

impl Default for GameBrief {
    fn default() -> Self {
        Self {
            game_name: "Settlers of Catan".to_string(),
            target_points: 10,
            strategy_tips: [
                "Manage resources carefully; build when you can",
                "Consider opponent positions and threats",
                "Longest road and largest army give bonus points",
                "Settlements are worth 1 VP, cities 2 VP",
                "Development cards can provide VPs and strategic advantages",
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
        }
    }
}

/// Build the system prompt for `player`'s next decision
pub fn build_system_prompt(player: &str, brief: &GameBrief, recent_moves: &[String]) -> String {
    let mut prompt = String::new();

    let _ = writeln!(prompt, "You are an expert {} player playing as {player}.", brief.game_name);
    let _ = writeln!(
        prompt,
        "\nYour goal is to win the game by reaching {} victory points.",
        brief.target_points
    );

    prompt.push_str("\nYou have tools to explore the game state:\n");
    let _ = writeln!(prompt, "1. **{GET_STATE}** - View your resources, buildings, victory points, and opponent info");
    let _ = writeln!(prompt, "2. **{GET_VALID_ACTIONS}** - See all actions you can take right now");
    let _ = writeln!(prompt, "3. **{SELECT_ACTION}** - Choose an action by its action_id");

    prompt.push_str("\nProcess:\n");
    let _ = writeln!(prompt, "1. Call {GET_STATE} to understand the current situation");
    let _ = writeln!(prompt, "2. Call {GET_VALID_ACTIONS} to see what you can do");
    prompt.push_str("3. Analyze the options strategically\n");
    let _ = writeln!(prompt, "4. Call {SELECT_ACTION} with your chosen action_id");

    if !brief.strategy_tips.is_empty() {
        prompt.push_str("\nStrategy tips:\n");
        let _ = writeln!(
            prompt,
            "- Focus on reaching {} victory points efficiently",
            brief.target_points
        );
        for tip in &brief.strategy_tips {
            let _ = writeln!(prompt, "- {tip}");
        }
    }

    let start = recent_moves.len().saturating_sub(PROMPT_RECENT_MOVES);
    let recent = &recent_moves[start..];
    if !recent.is_empty() {
        let _ = writeln!(prompt, "\nYour recent moves: {}", recent.join(", "));
    }

    prompt.push_str("\nMake your decision now by using the tools.");
    prompt
}
