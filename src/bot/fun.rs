//! Random-output commands.

use rand::Rng;

use crate::catalogue::Lines;
use crate::command::FunCommand;

fn ship_verdict(percent: u32) -> &'static str {
    match percent {
        90..=100 => "Soulmates! 💍",
        70..=89 => "A great match! 😍",
        50..=69 => "There's potential! 😊",
        25..=49 => "Could work... maybe 🤔",
        _ => "Better as friends 😅",
    }
}

/// Render the public reply for a fun command. `sender` stands in for a
/// missing target.
pub fn render<R: Rng + ?Sized>(
    command: &FunCommand,
    sender: &str,
    lines: &Lines,
    rng: &mut R,
) -> String {
    let or_sender = |target: &Option<String>| target.clone().unwrap_or_else(|| sender.to_string());

    match command {
        FunCommand::Rizz { target } => {
            format!("💘 @{} {}", or_sender(target), lines.random_rizz(rng))
        }
        FunCommand::Roast { target } => {
            format!("🔥 @{} {}", or_sender(target), lines.random_roast(rng))
        }
        FunCommand::Joke => format!("😂 {}", lines.random_joke(rng)),
        FunCommand::Ship { first, second } => {
            let percent = rng.gen_range(0..=100);
            format!(
                "💞 @{} + @{} = {}% compatible! {}",
                or_sender(first),
                second,
                percent,
                ship_verdict(percent)
            )
        }
        FunCommand::Iq { target } => {
            format!("🧠 @{}'s IQ is {}", or_sender(target), rng.gen_range(1..=200))
        }
        FunCommand::LovePercentage { target } => {
            format!("❤️ @{} is {}% full of love", or_sender(target), rng.gen_range(0..=100))
        }
        FunCommand::HatePercentage { target } => {
            format!("💢 @{} is {}% full of hate", or_sender(target), rng.gen_range(0..=100))
        }
        FunCommand::StraightMeter { target } => {
            format!("📏 @{} is {}% straight", or_sender(target), rng.gen_range(0..=100))
        }
    }
}
