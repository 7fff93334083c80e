// Fun cog: dice, coin flips and the magic 8-ball.

use super::Command;
use crate::discord::{Context, Error};
use rand::seq::SliceRandom;
use rand::Rng;

const MAX_DICE: u32 = 20;
const MAX_SIDES: u32 = 1000;

const EIGHT_BALL_ANSWERS: &[&str] = &[
    "It is certain.",
    "Without a doubt.",
    "You may rely on it.",
    "Most likely.",
    "Signs point to yes.",
    "Reply hazy, try again.",
    "Ask again later.",
    "Cannot predict now.",
    "Don't count on it.",
    "My sources say no.",
    "Very doubtful.",
];

pub fn commands() -> Vec<Command> {
    vec![roll(), coinflip(), eightball()]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DiceSpec {
    count: u32,
    sides: u32,
}

/// Parse `NdM`, `dM` or `M`.
fn parse_dice(input: &str) -> Result<DiceSpec, String> {
    let input = input.trim().to_lowercase();
    let (count, sides) = match input.split_once('d') {
        Some(("", sides)) => ("1", sides),
        Some((count, sides)) => (count, sides),
        None => ("1", input.as_str()),
    };

    let count: u32 = count
        .parse()
        .map_err(|_| format!("`{count}` is not a number of dice"))?;
    let sides: u32 = sides
        .parse()
        .map_err(|_| format!("`{sides}` is not a number of sides"))?;

    if !(1..=MAX_DICE).contains(&count) {
        return Err(format!("You can roll between 1 and {MAX_DICE} dice"));
    }
    if !(2..=MAX_SIDES).contains(&sides) {
        return Err(format!("Dice need between 2 and {MAX_SIDES} sides"));
    }

    Ok(DiceSpec { count, sides })
}

/// Roll dice, e.g. `2d6`.
#[poise::command(prefix_command, slash_command)]
pub async fn roll(
    ctx: Context<'_>,
    #[description = "Dice to roll (default 1d6)"] dice: Option<String>,
) -> Result<(), Error> {
    let parsed = match parse_dice(dice.as_deref().unwrap_or("1d6")) {
        Ok(parsed) => parsed,
        Err(reason) => {
            ctx.say(format!("🎲 {reason}.")).await?;
            return Ok(());
        }
    };

    // ThreadRng is not Send; keep it out of the await below.
    let rolls: Vec<u32> = {
        let mut rng = rand::thread_rng();
        (0..parsed.count)
            .map(|_| rng.gen_range(1..=parsed.sides))
            .collect()
    };
    let total: u32 = rolls.iter().sum();

    let shown = rolls
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    ctx.say(format!(
        "🎲 {}d{}: [{}] = **{}**",
        parsed.count, parsed.sides, shown, total
    ))
    .await?;
    Ok(())
}

/// Flip a coin.
#[poise::command(prefix_command, slash_command, aliases("flip"))]
pub async fn coinflip(ctx: Context<'_>) -> Result<(), Error> {
    let heads = rand::random::<bool>();
    ctx.say(if heads { "🪙 Heads!" } else { "🪙 Tails!" })
        .await?;
    Ok(())
}

/// Ask the magic 8-ball a question.
#[poise::command(prefix_command, slash_command, aliases("8ball"))]
pub async fn eightball(
    ctx: Context<'_>,
    #[description = "Your question"]
    #[rest]
    question: String,
) -> Result<(), Error> {
    let answer = EIGHT_BALL_ANSWERS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or("Ask again later.");

    ctx.say(format!("🎱 *{}*\n{}", question.trim(), answer))
        .await?;
    Ok(())
}
