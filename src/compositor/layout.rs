//! Plan Layout
//!
//! Lays a travel plan out as a fixed-width render tree for export. Text is
//! wrapped with an average glyph width, so boxes are estimates rather than
//! measured glyph runs.

use super::geometry::Rect;
use super::tree::{Color, RenderNode};
use crate::planner::{DestinationSuggestion, TravelPlan};

/// Source width of the exported layout, in CSS pixels.
pub const LAYOUT_WIDTH: f64 = 800.0;

const PADDING: f64 = 32.0;
const CARD_PADDING: f64 = 20.0;
const SECTION_GAP: f64 = 28.0;
const LINE_SPACING: f64 = 1.4;
/// Average glyph advance as a fraction of the font size
const GLYPH_WIDTH: f64 = 0.55;

const CANVAS: Color = Color::rgb(0x1e, 0x29, 0x3b);
const CARD: Color = Color::rgb(0x33, 0x41, 0x55);
const HEADING: Color = Color::rgb(0x67, 0xe8, 0xf9);
const BODY: Color = Color::rgb(0xcb, 0xd5, 0xe1);
const MUTED: Color = Color::rgb(0x94, 0xa3, 0xb8);
const LINK: Color = Color::rgb(0x22, 0xd3, 0xee);

// == Layout Builder ==
/// Stacks blocks top to bottom, tracking the current Y.
struct Flow {
    y: f64,
}

impl Flow {
    fn new() -> Self {
        Self { y: PADDING }
    }

    fn gap(&mut self, amount: f64) {
        self.y += amount;
    }

    /// Appends wrapped lines of `text` to `parent` starting at `x`.
    fn paragraph(
        &mut self,
        parent: &mut RenderNode,
        x: f64,
        width: f64,
        text: &str,
        font_size: f64,
        color: Color,
    ) {
        let line_height = font_size * LINE_SPACING;
        for line in wrap(text, width, font_size) {
            let line_width = (line.chars().count() as f64 * font_size * GLYPH_WIDTH).min(width);
            parent.push(RenderNode::text(
                Rect::new(x, self.y, line_width, line_height),
                line,
                font_size,
                color,
            ));
            self.y += line_height;
        }
    }

    /// Appends a single-line link with its visible label.
    fn link(
        &mut self,
        parent: &mut RenderNode,
        x: f64,
        width: f64,
        label: &str,
        href: &str,
        font_size: f64,
    ) {
        let line_height = font_size * LINE_SPACING;
        let label = wrap(label, width, font_size)
            .into_iter()
            .next()
            .unwrap_or_default();
        let label_width = (label.chars().count() as f64 * font_size * GLYPH_WIDTH).min(width);
        let rect = Rect::new(x, self.y, label_width, line_height);
        parent.push(
            RenderNode::link(rect, href).with_child(RenderNode::text(rect, label, font_size, LINK)),
        );
        self.y += line_height;
    }

    /// Runs `fill` inside a card; the card grows to fit what was added.
    fn card(&mut self, parent: &mut RenderNode, fill: impl FnOnce(&mut Flow, &mut RenderNode, f64, f64)) {
        let top = self.y;
        let mut card = RenderNode::block(
            Rect::new(PADDING, top, LAYOUT_WIDTH - 2.0 * PADDING, 0.0),
            Some(CARD),
        );
        self.y += CARD_PADDING;
        let inner_x = PADDING + CARD_PADDING;
        let inner_width = LAYOUT_WIDTH - 2.0 * (PADDING + CARD_PADDING);
        fill(self, &mut card, inner_x, inner_width);
        self.y += CARD_PADDING;
        card.rect.height = self.y - top;
        parent.push(card);
        self.y += SECTION_GAP;
    }
}

/// Greedy word wrap using the average glyph width. Overlong words are split.
pub fn wrap(text: &str, width: f64, font_size: f64) -> Vec<String> {
    let max_chars = ((width / (font_size * GLYPH_WIDTH)).floor() as usize).max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > max_chars {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            let word: String = word.into_iter().collect();
            let needed = current.chars().count() + usize::from(!current.is_empty()) + word.chars().count();
            if needed > max_chars && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&word);
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

fn money(amount: f64) -> String {
    format!("${:.0}", amount.max(0.0))
}

/// Turns markdown bullets (`* item`, `- item`) into plain bullet lines.
fn bullet_lines(markdown: &str) -> Vec<String> {
    markdown
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let item = line
                .strip_prefix("* ")
                .or_else(|| line.strip_prefix("- "))
                .unwrap_or(line);
            format!("- {}", item.replace("**", ""))
        })
        .collect()
}

// == Plan Layout ==
/// Lays out `plan` for `destination` as an export-ready render tree.
pub fn layout_plan(plan: &TravelPlan, destination: &DestinationSuggestion) -> RenderNode {
    let mut root = RenderNode::block(Rect::new(0.0, 0.0, LAYOUT_WIDTH, 0.0), Some(CANVAS));
    let mut flow = Flow::new();
    let x = PADDING;
    let width = LAYOUT_WIDTH - 2.0 * PADDING;

    // Header
    flow.paragraph(
        &mut root,
        x,
        width,
        &format!("Your Trip to {}", destination.name),
        32.0,
        HEADING,
    );
    flow.gap(8.0);
    flow.paragraph(
        &mut root,
        x,
        width,
        &format!("{} Day Adventure", plan.day_count()),
        18.0,
        BODY,
    );
    let total = plan.activity_cost();
    if total > 0.0 {
        flow.paragraph(
            &mut root,
            x,
            width,
            &format!("Est. Budget: ~{}", money(total)),
            18.0,
            BODY,
        );
    }
    flow.gap(SECTION_GAP);

    // Official resources
    if let Some(links) = plan.official_links.as_ref().filter(|l| !l.is_empty()) {
        flow.card(&mut root, |flow, card, x, width| {
            flow.paragraph(card, x, width, "Official Resources", 20.0, HEADING);
            flow.gap(8.0);
            for link in links {
                flow.link(card, x, width, &link.title, &link.url, 14.0);
            }
        });
    }

    // Days
    for day in &plan.itinerary {
        flow.card(&mut root, |flow, card, x, width| {
            flow.paragraph(
                card,
                x,
                width,
                &format!("Day {}: {}", day.day, day.title),
                22.0,
                HEADING,
            );
            flow.gap(10.0);
            for activity in &day.activities {
                if activity.link.trim().is_empty() {
                    flow.paragraph(card, x, width, &activity.name, 17.0, BODY);
                } else {
                    flow.link(card, x, width, &activity.name, &activity.link, 17.0);
                }
                flow.paragraph(
                    card,
                    x,
                    width,
                    &format!("{} | ~{}", activity.kind, money(activity.average_cost)),
                    13.0,
                    MUTED,
                );
                flow.paragraph(card, x, width, &activity.description, 14.0, BODY);
                for extra in activity.links.iter().flatten() {
                    flow.link(card, x + 12.0, width - 12.0, &extra.title, &extra.url, 13.0);
                }
                flow.gap(12.0);
            }

            let notes = bullet_lines(&day.keep_in_mind);
            if !notes.is_empty() {
                flow.paragraph(card, x, width, "Keep in Mind", 16.0, HEADING);
                for note in notes {
                    flow.paragraph(card, x, width, &note, 14.0, BODY);
                }
            }
        });
    }

    // Cost summary
    let mut accommodation = 0.0;
    let mut food = 0.0;
    let mut activities = 0.0;
    for activity in plan.activities() {
        accommodation += activity.cost_breakdown.accommodation;
        food += activity.cost_breakdown.food;
        activities += activity.cost_breakdown.activities;
    }
    flow.card(&mut root, |flow, card, x, width| {
        flow.paragraph(card, x, width, "Final Estimated Cost Summary", 20.0, HEADING);
        flow.gap(8.0);
        for (label, amount) in [
            ("Accommodation", accommodation),
            ("Activities", activities),
            ("Food & Dining", food),
        ] {
            flow.paragraph(card, x, width, &format!("{}: {}", label, money(amount)), 15.0, BODY);
        }
        flow.gap(6.0);
        flow.paragraph(
            card,
            x,
            width,
            &format!("Grand Total (per person): ~{}", money(accommodation + activities + food)),
            17.0,
            HEADING,
        );
        flow.paragraph(
            card,
            x,
            width,
            "Disclaimer: These are estimates based on the generated plan and do not include international airfare.",
            12.0,
            MUTED,
        );
    });

    // Optimization tips
    if !plan.optimization_suggestions.trim().is_empty() {
        flow.card(&mut root, |flow, card, x, width| {
            flow.paragraph(card, x, width, "Pro-Tip: Itinerary Optimization", 20.0, HEADING);
            flow.gap(8.0);
            flow.paragraph(card, x, width, &plan.optimization_suggestions, 15.0, BODY);
        });
    }

    // Packing list
    if let Some(list) = plan.packing_list.as_ref().filter(|l| !l.is_empty()) {
        let checked = plan.checked_packing_items.as_ref();
        flow.card(&mut root, |flow, card, x, width| {
            flow.paragraph(card, x, width, "Packing List", 20.0, HEADING);
            flow.gap(8.0);
            for category in list {
                flow.paragraph(card, x, width, &category.category_name, 16.0, BODY);
                for item in &category.items {
                    let done = checked.and_then(|c| c.get(item)).copied().unwrap_or(false);
                    let mark = if done { "[x]" } else { "[ ]" };
                    flow.paragraph(card, x + 12.0, width - 12.0, &format!("{} {}", mark, item), 14.0, BODY);
                }
                flow.gap(6.0);
            }
        });
    }

    root.rect.height = flow.y - SECTION_GAP + PADDING;
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::tree::NodeKind;
    use crate::planner::models::tests::sample_plan;
    use crate::planner::{CostBreakdown, OfficialLink, PackingListCategory};

    fn destination() -> DestinationSuggestion {
        DestinationSuggestion {
            name: "Nepal".to_string(),
            country: "Nepal".to_string(),
            description: "Mountains".to_string(),
            visa_info: "Visa on arrival".to_string(),
            average_cost: 700.0,
            cost_breakdown: CostBreakdown::default(),
        }
    }

    #[test]
    fn test_wrap() {
        // 10px font -> 5.5px per glyph -> 10 glyphs in 56px
        assert_eq!(
            wrap("the quick brown fox", 56.0, 10.0),
            vec!["the quick", "brown fox"]
        );
        assert_eq!(wrap("abcdefghijklmno", 56.0, 10.0), vec!["abcdefghij", "klmno"]);
        assert_eq!(wrap("one\ntwo", 550.0, 10.0), vec!["one", "two"]);
        assert!(wrap("   ", 56.0, 10.0).is_empty());
    }

    #[test]
    fn test_layout_contains_plan_text() {
        let root = layout_plan(&sample_plan(), &destination());
        let texts: Vec<&str> = root.visible_text().iter().map(|s| s.text).collect();

        assert_eq!(texts[0], "Your Trip to Nepal");
        assert!(texts.contains(&"2 Day Adventure"));
        assert!(texts.contains(&"Day 1: Arrival"));
        assert!(texts.contains(&"Temple"));
        assert!(texts.contains(&"- Do carry cash"));
        assert!(texts.contains(&"Grand Total (per person): ~$30"));
    }

    #[test]
    fn test_layout_is_stacked_and_bounded() {
        let root = layout_plan(&sample_plan(), &destination());
        assert_eq!(root.rect.width, LAYOUT_WIDTH);

        let spans = root.visible_text();
        for pair in spans.windows(2) {
            assert!(pair[1].rect.y >= pair[0].rect.y);
        }
        for span in &spans {
            assert!(span.rect.right() <= LAYOUT_WIDTH);
            assert!(span.rect.bottom() <= root.rect.height);
        }
    }

    #[test]
    fn test_activity_and_official_links() {
        let mut plan = sample_plan();
        plan.official_links = Some(vec![OfficialLink {
            title: "Nepal Tourism Board".to_string(),
            url: "https://ntb.gov.np".to_string(),
        }]);
        let root = layout_plan(&plan, &destination());

        let hrefs: Vec<&str> = root.web_links().iter().map(|l| l.href).collect();
        assert_eq!(hrefs[0], "https://ntb.gov.np");
        assert!(hrefs.contains(&"https://www.tripadvisor.com/Temple"));
        assert_eq!(hrefs.len(), 4);
    }

    #[test]
    fn test_packing_list_marks_checked() {
        let mut plan = sample_plan();
        plan.set_packing_list(vec![PackingListCategory {
            category_name: "Gear".to_string(),
            items: vec!["Boots".to_string(), "Poles".to_string()],
        }]);
        plan.toggle_packing_item("Boots");
        let root = layout_plan(&plan, &destination());

        let texts: Vec<&str> = root.visible_text().iter().map(|s| s.text).collect();
        assert!(texts.contains(&"[x] Boots"));
        assert!(texts.contains(&"[ ] Poles"));
    }

    #[test]
    fn test_cards_have_backgrounds() {
        let root = layout_plan(&sample_plan(), &destination());
        let cards = root
            .children
            .iter()
            .filter(|c| matches!(c.kind, NodeKind::Block { background: Some(_) }))
            .count();
        // two days, cost summary, optimization tip
        assert_eq!(cards, 4);
    }
}
