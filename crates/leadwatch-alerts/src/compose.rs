//! Alert message rendering (Telegram HTML subset: `<b>`, `<i>`, `<a>`).

use chrono::NaiveDate;
use leadwatch_core::config::AlertConfig;
use leadwatch_core::types::{Lead, Staleness};
use std::fmt::Write;

use crate::buckets::Buckets;

/// Rendered in place of the alert sections when nothing needs follow-up.
pub const ALL_CLEAR: &str =
    "✅ <b>All Clear!</b>\nNo leads need immediate attention. Great work! 🎉";

/// Compose with the default [`AlertConfig`].
pub fn compose(leads: &[Lead], now: NaiveDate) -> String {
    AlertComposer::default().compose(leads, now)
}

/// Renders a lead snapshot into a single alert message. Pure.
#[derive(Debug, Clone, Default)]
pub struct AlertComposer {
    config: AlertConfig,
}

impl AlertComposer {
    pub fn new(config: AlertConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AlertConfig {
        &self.config
    }

    pub fn compose(&self, leads: &[Lead], now: NaiveDate) -> String {
        let buckets = Buckets::classify(leads);
        self.render(&buckets, now)
    }

    pub fn render(&self, buckets: &Buckets<'_>, now: NaiveDate) -> String {
        let mut out = String::new();

        let _ = writeln!(
            out,
            "🚨 <b>CRM Lead Alerts - {}</b>",
            escape_html(&self.config.team_name)
        );
        let _ = writeln!(out, "📅 {}", now.format("%B %d, %Y"));
        out.push_str("\n📊 <b>Summary</b>\n");
        for staleness in [
            Staleness::Critical,
            Staleness::Warning,
            Staleness::Attention,
            Staleness::Recent,
        ] {
            let _ = writeln!(
                out,
                "• {} {}: {} leads ({})",
                staleness.emoji(),
                title_case(staleness.label()),
                buckets.get(staleness).len(),
                staleness.range()
            );
        }

        let sections = [
            (Staleness::Critical, "CRITICAL - 21+ Days Without Contact", self.config.critical_cap),
            (Staleness::Warning, "WARNING - 14-20 Days", self.config.warning_cap),
            (Staleness::Attention, "ATTENTION - 7-13 Days", self.config.attention_cap),
        ];
        for (staleness, title, cap) in sections {
            self.render_section(&mut out, staleness, title, buckets.get(staleness), cap);
        }

        let total = buckets.alert_count();
        if total == 0 {
            out.push('\n');
            out.push_str(ALL_CLEAR);
        } else {
            let _ = write!(
                out,
                "\n\n💡 <b>Action Required</b>\nTotal leads needing follow-up: <b>{total}</b>"
            );
        }
        out
    }

    fn render_section(
        &self,
        out: &mut String,
        staleness: Staleness,
        title: &str,
        leads: &[&Lead],
        cap: usize,
    ) {
        if leads.is_empty() {
            return;
        }
        // Sections are separated from whatever precedes them by a blank line
        out.push_str(if out.ends_with('\n') { "\n" } else { "\n\n" });
        let _ = writeln!(out, "{} <b>{title}</b>", staleness.emoji());
        for (i, lead) in leads.iter().take(cap).enumerate() {
            self.render_entry(out, i + 1, lead);
        }
        if leads.len() > cap {
            let _ = write!(
                out,
                "\n\n<i>... and {} more {} leads</i>",
                leads.len() - cap,
                staleness.label()
            );
        }
    }

    fn render_entry(&self, out: &mut String, index: usize, lead: &Lead) {
        let _ = write!(out, "\n{index}. <b>{}</b>", escape_html(&lead.name));
        if !lead.company.is_empty() {
            let _ = write!(out, " - {}", escape_html(&lead.company));
        }
        let _ = write!(
            out,
            "\n   📅 {} days | Last: {}",
            lead.days_since_contact,
            escape_html(&lead.last_contact)
        );
        if !lead.telegram.is_empty() {
            let _ = write!(out, "\n   💬 {}", escape_html(&lead.telegram));
        }
        let _ = write!(
            out,
            "\n   🔗 <a href=\"{}\">{}</a>",
            escape_html(&lead.url),
            escape_html(&self.config.link_label)
        );
    }
}

/// Escape text for Telegram's HTML parse mode.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
