//! Terminal rendering of itineraries, days and patches

use colored::Colorize;

use crate::domain::{ChatMessage, Day, Itinerary, PendingPatch, Sender, Slot};

/// Trip header: destination, dates, preferences, overview
pub fn format_overview(itinerary: &Itinerary) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", itinerary.destination.bright_cyan().bold()));
    out.push_str(&format!(
        "{} to {} ({} days)\n",
        itinerary.start_date(),
        itinerary.end_date,
        itinerary.day_count()
    ));
    if let Some(id) = &itinerary.id {
        out.push_str(&format!("{} {}\n", "id:".dimmed(), id));
    }
    if !itinerary.preferences.is_empty() {
        out.push_str(&format!("{} {}\n", "Preferences:".bold(), itinerary.preferences.join(", ")));
    }
    if !itinerary.description.is_empty() {
        out.push_str(&format!("{}\n", itinerary.description));
    }
    out
}

/// One day with every field
pub fn format_day(day: &Day) -> String {
    let mut out = String::new();
    let date = day.date.map(|d| d.format("%a %b %-d, %Y").to_string()).unwrap_or_default();
    out.push_str(&format!(
        "{} {}  {}\n",
        format!("Day {}:", day.day).bright_green().bold(),
        day.title,
        date.dimmed()
    ));
    if !day.location.is_empty() {
        out.push_str(&format!("  {} {}\n", "Location:".bold(), day.location));
    }
    if !day.description.is_empty() {
        out.push_str(&format!("  {}\n", day.description));
    }
    for slot in Slot::ALL {
        let value = day.time_slots.get(slot);
        if !value.is_empty() {
            out.push_str(&format!("  {:10} {}\n", format!("{}:", slot.label()).yellow(), value));
        }
    }
    out
}

/// Whole itinerary: overview plus every day
pub fn format_itinerary(itinerary: &Itinerary) -> String {
    let mut out = format_overview(itinerary);
    for day in itinerary.days() {
        out.push('\n');
        out.push_str(&format_day(day));
    }
    out
}

/// Field-by-field preview of a patch against the day it targets
pub fn format_patch(patch: &PendingPatch, day: Option<&Day>) -> String {
    if patch.is_empty() {
        return format!("  {}\n", "(no changes proposed)".dimmed());
    }
    let mut out = String::new();
    for (path, value) in patch.fields() {
        out.push_str(&format!("  {} {}\n", format!("{}:", path).yellow(), value));
        if let Some(current) = day.map(|d| d.field(path)) {
            out.push_str(&format!("  {} {}\n", "   was:".dimmed(), current.dimmed()));
        }
    }
    out
}

/// One transcript line, truncated for listings
pub fn format_message_line(message: &ChatMessage) -> String {
    let who = match message.sender() {
        Sender::User => "You".bright_green(),
        Sender::Assistant => "Assistant".bright_blue(),
    };
    let preview: String = message.text().chars().take(60).collect();
    let preview = if message.text().chars().count() > 60 {
        format!("{}...", preview)
    } else {
        preview
    };
    let status = match message.proposal() {
        Some(p) if p.is_applied() => " [applied]".dimmed().to_string(),
        Some(p) if !p.patch().is_empty() => format!(" [{} change(s)]", p.patch().len()),
        _ => String::new(),
    };
    format!("  #{} {}: {}{}", message.id(), who, preview, status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldPath, TimeSlots};
    use chrono::NaiveDate;

    fn day() -> Day {
        let it = Itinerary::new(
            "Lima",
            NaiveDate::from_ymd_opt(2025, 8, 4).unwrap(),
            NaiveDate::from_ymd_opt(2025, 8, 4).unwrap(),
            vec![Day::new("Barranco", "Art and views", "Barranco").with_time_slots(TimeSlots::new("Murals", "", "Ceviche"))],
        );
        it.days()[0].clone()
    }

    #[test]
    fn test_format_day_skips_empty_slots() {
        colored::control::set_override(false);
        let text = format_day(&day());
        assert!(text.contains("Day 1: Barranco"));
        assert!(text.contains("Mon Aug 4, 2025"));
        assert!(text.contains("Ceviche"));
        assert!(!text.contains("Afternoon"));
    }

    #[test]
    fn test_format_patch_shows_previous_value() {
        colored::control::set_override(false);
        let patch = PendingPatch::new().with(FieldPath::Slot(Slot::Evening), "Rooftop dinner");
        let text = format_patch(&patch, Some(&day()));
        assert!(text.contains("timeSlots.evening: Rooftop dinner"));
        assert!(text.contains("was: Ceviche"));
    }

    #[test]
    fn test_format_empty_patch() {
        colored::control::set_override(false);
        assert!(format_patch(&PendingPatch::new(), None).contains("no changes proposed"));
    }
}
