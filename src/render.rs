//! User-facing message rendering.
//!
//! Every progress update is a full overwrite of the deferred response, so
//! each function here renders a complete message, not a delta.

use std::fmt::Write as _;

use crate::models::channel::{ChannelKind, ChannelSummary};
use crate::models::task::CompleteTask;

/// Glyph width of the progress bar.
pub const PROGRESS_BAR_WIDTH: usize = 20;

/// Render a fixed-width progress bar with percentage and counter, e.g.
/// `[████████░░░░░░░░░░░░] 40% (2/5)`.
///
/// Filled-glyph count and percentage are floored, so the bar is monotonic
/// in `current` and fully filled exactly at `current == total`.
#[must_use]
pub fn progress_bar(current: usize, total: usize) -> String {
    if total == 0 {
        return format!("[{}] 0% (0/0)", "░".repeat(PROGRESS_BAR_WIDTH));
    }
    let current = current.min(total);
    let filled = current * PROGRESS_BAR_WIDTH / total;
    let percentage = current * 100 / total;
    format!(
        "[{}{}] {percentage}% ({current}/{total})",
        "█".repeat(filled),
        "░".repeat(PROGRESS_BAR_WIDTH - filled),
    )
}

/// Render the progress message shown after one channel is created.
#[must_use]
pub fn creation_status(
    campaign_name: &str,
    channel_name: &str,
    kind: ChannelKind,
    current: usize,
    total: usize,
) -> String {
    format!(
        "🏗️ **Creating Campaign: {campaign_name}**\n\n{}\n\n✅ Created: **{channel_name}** ({})",
        progress_bar(current, total),
        kind.label(),
    )
}

/// Render the final campaign summary from pre-computed channel snapshots.
///
/// Sections appear in fixed Text / Voice / Forum order, each entry tagged
/// with 🔒 when GM-only, plus an advisory line when any GM-only channel
/// exists (the bot cannot enforce GM-only permissions itself).
#[must_use]
pub fn completion_summary(task: &CompleteTask) -> String {
    let mut summary = format!(
        "✅ **Campaign Created: {}**\n\n**Role:** {}\n\n**Created {} channels:**\n",
        task.campaign_name,
        task.role_name,
        task.created_channels.len(),
    );

    if task.created_channels.iter().any(|ch| ch.gm_only) {
        summary.push_str("\n⚠️ _Channels marked 🔒 need manual GM-only setup_\n");
    }

    append_group(&mut summary, "📝 Text:", &task.created_channels, ChannelKind::Text);
    append_group(&mut summary, "🔊 Voice:", &task.created_channels, ChannelKind::Voice);
    append_group(&mut summary, "💬 Forum:", &task.created_channels, ChannelKind::Forum);

    summary
}

fn append_group(summary: &mut String, header: &str, channels: &[ChannelSummary], kind: ChannelKind) {
    let mut entries = channels.iter().filter(|ch| ch.kind == kind).peekable();
    if entries.peek().is_none() {
        return;
    }
    summary.push_str(header);
    summary.push('\n');
    for channel in entries {
        let gm_tag = if channel.gm_only { " 🔒" } else { "" };
        let _ = writeln!(summary, "  • {}{gm_tag}", channel.name);
    }
}

/// Render the ephemeral failure message for the synchronous setup phase.
#[must_use]
pub fn campaign_failure(campaign_name: &str, error: &str) -> String {
    format!("❌ **Failed to create campaign: {campaign_name}**\n\nError: {error}")
}

/// Render the best-effort error edit for a failed worker task.
#[must_use]
pub fn worker_failure(error: &str) -> String {
    format!("❌ **Error creating campaign**\n\nError: {error}")
}

/// Render the greeting for the stateless hello command.
#[must_use]
pub fn greeting(username: &str) -> String {
    format!("👋 Hello, {username}! ChannelWright at your service.")
}
