//! SVG renderer: converts `RenderCommand` lists into standalone SVG strings.

use std::fmt::Write as _;

use questlog_protocol::{RenderCommand, TextAlign, ThemeToken};

/// Render a list of commands as an SVG document string.
///
/// `width` and `height` define the SVG viewBox dimensions.
/// `dark` selects the color palette.
pub fn render_svg(commands: &[RenderCommand], width: f64, height: f64, dark: bool) -> String {
    let mut svg = String::with_capacity(commands.len() * 160);
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}" style="font-family:system-ui,-apple-system,sans-serif;font-size:11px">"#,
    );
    let _ = write!(
        svg,
        r#"<rect width="{width}" height="{height}" fill="{}"/>"#,
        resolve_color(ThemeToken::Background, dark),
    );

    // Open <g> elements, so unbalanced input still yields valid XML.
    let mut open_groups = 0usize;

    for cmd in commands {
        match cmd {
            RenderCommand::DrawRect {
                rect,
                color,
                border_color,
                label,
                entry_id,
            } => {
                let fill = resolve_color(*color, dark);
                let _ = write!(
                    svg,
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{fill}" rx="3""#,
                    rect.x, rect.y, rect.w, rect.h,
                );
                if let Some(border) = border_color {
                    let _ = write!(svg, r#" stroke="{}""#, resolve_color(*border, dark));
                }
                if let Some(id) = entry_id {
                    let _ = write!(svg, r#" data-entry="{}""#, escape_xml(id));
                }
                svg.push('>');
                if let Some(label) = label {
                    let _ = write!(svg, "<title>{}</title>", escape_xml(label));
                }
                svg.push_str("</rect>");

                if let Some(label) = label
                    && rect.w > 30.0
                {
                    let text_color = resolve_color(ThemeToken::TextPrimary, dark);
                    let tx = rect.x + 4.0;
                    let ty = rect.y + rect.h * 0.7;
                    let max_chars = (rect.w / 7.0) as usize;
                    let text = if label.chars().count() > max_chars && max_chars > 2 {
                        let truncated: String = label.chars().take(max_chars - 1).collect();
                        format!("{truncated}…")
                    } else {
                        label.to_string()
                    };
                    let _ = write!(
                        svg,
                        r#"<text x="{tx}" y="{ty}" fill="{text_color}" style="pointer-events:none">{}</text>"#,
                        escape_xml(&text),
                    );
                }
            }
            RenderCommand::DrawCircle {
                center,
                radius,
                color,
            } => {
                let _ = write!(
                    svg,
                    r#"<circle cx="{}" cy="{}" r="{radius}" fill="{}"/>"#,
                    center.x,
                    center.y,
                    resolve_color(*color, dark),
                );
            }
            RenderCommand::DrawLine {
                from,
                to,
                color,
                width: line_width,
            } => {
                let stroke = resolve_color(*color, dark);
                let _ = write!(
                    svg,
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{stroke}" stroke-width="{line_width}"/>"#,
                    from.x, from.y, to.x, to.y,
                );
            }
            RenderCommand::DrawText {
                text,
                position,
                color,
                font_size,
                align,
            } => {
                let anchor = match align {
                    TextAlign::Left => "start",
                    TextAlign::Center => "middle",
                    TextAlign::Right => "end",
                };
                let _ = write!(
                    svg,
                    r#"<text x="{}" y="{}" fill="{}" font-size="{font_size}" text-anchor="{anchor}">{}</text>"#,
                    position.x,
                    position.y,
                    resolve_color(*color, dark),
                    escape_xml(text),
                );
            }
            RenderCommand::PushTransform { translate, scale } => {
                let _ = write!(
                    svg,
                    r#"<g transform="translate({} {}) scale({} {})">"#,
                    translate.x, translate.y, scale.x, scale.y,
                );
                open_groups += 1;
            }
            RenderCommand::BeginGroup { id, .. } => {
                let _ = write!(svg, r#"<g id="{}">"#, escape_xml(id));
                open_groups += 1;
            }
            RenderCommand::PopTransform | RenderCommand::EndGroup => {
                if open_groups > 0 {
                    svg.push_str("</g>");
                    open_groups -= 1;
                }
            }
            // Clipping has no effect on a static export of the full view.
            RenderCommand::SetClip { .. } | RenderCommand::ClearClip => {}
        }
    }

    for _ in 0..open_groups {
        svg.push_str("</g>");
    }
    svg.push_str("</svg>");
    svg
}

fn resolve_color(token: ThemeToken, dark: bool) -> &'static str {
    if dark {
        match token {
            ThemeToken::Background => "#121212",
            ThemeToken::Surface | ThemeToken::NavBackground => "#1e1e24",
            ThemeToken::Border => "#3a3a44",
            ThemeToken::TextPrimary | ThemeToken::NavText | ThemeToken::TooltipText => "#ececec",
            ThemeToken::TextSecondary | ThemeToken::TextMuted | ThemeToken::EmptyState => "#9e9e9e",
            ThemeToken::QuestMain => "#5c7cfa",
            ThemeToken::QuestSide => "#20c997",
            ThemeToken::QuestOther => "#868e96",
            ThemeToken::QuestOngoing => "#fab005",
            ThemeToken::Connector | ThemeToken::Axis => "#5f5f6b",
            ThemeToken::AxisMarker | ThemeToken::NavActive => "#e6e6f0",
            ThemeToken::SelectionHighlight | ThemeToken::HoverHighlight => "#ffd43b",
            ThemeToken::TooltipBackground => "#f1f3f5",
            ThemeToken::Splash => "#845ef7",
        }
    } else {
        match token {
            ThemeToken::Background => "#ffffff",
            ThemeToken::Surface | ThemeToken::NavBackground => "#f8f9fa",
            ThemeToken::Border => "#dee2e6",
            ThemeToken::TextPrimary | ThemeToken::NavText => "#1a1a2e",
            ThemeToken::TooltipText => "#ffffff",
            ThemeToken::TextSecondary | ThemeToken::TextMuted | ThemeToken::EmptyState => "#666677",
            ThemeToken::QuestMain => "#3b5bdb",
            ThemeToken::QuestSide => "#0ca678",
            ThemeToken::QuestOther => "#adb5bd",
            ThemeToken::QuestOngoing => "#f08c00",
            ThemeToken::Connector | ThemeToken::Axis => "#adb5bd",
            ThemeToken::AxisMarker | ThemeToken::NavActive => "#1a1a2e",
            ThemeToken::SelectionHighlight | ThemeToken::HoverHighlight => "#e67700",
            ThemeToken::TooltipBackground => "#212529",
            ThemeToken::Splash => "#7048e8",
        }
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use questlog_protocol::{Point, Rect};

    #[test]
    fn basic_svg_output() {
        let commands = vec![RenderCommand::DrawRect {
            rect: Rect::new(10.0, 20.0, 100.0, 18.0),
            color: ThemeToken::QuestMain,
            border_color: Some(ThemeToken::SelectionHighlight),
            label: Some("Backend".into()),
            entry_id: Some("job".into()),
        }];
        let svg = render_svg(&commands, 800.0, 400.0, true);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("Backend"));
        assert!(svg.contains("#5c7cfa"));
        assert!(svg.contains(r#"data-entry="job""#));
        assert!(svg.contains(r##"stroke="#ffd43b""##));
    }

    #[test]
    fn escapes_xml_entities() {
        let commands = vec![RenderCommand::DrawRect {
            rect: Rect::new(0.0, 0.0, 200.0, 18.0),
            color: ThemeToken::QuestSide,
            border_color: None,
            label: Some("R&D <lab>".into()),
            entry_id: None,
        }];
        let svg = render_svg(&commands, 400.0, 100.0, false);
        assert!(svg.contains("R&amp;D &lt;lab&gt;"));
    }

    #[test]
    fn transforms_become_balanced_groups() {
        let commands = vec![
            RenderCommand::BeginGroup {
                id: "timeline".into(),
                label: None,
            },
            RenderCommand::PushTransform {
                translate: Point::new(200.0, 0.0),
                scale: Point::new(1.0, 1.0),
            },
            RenderCommand::DrawCircle {
                center: Point::new(0.0, 10.0),
                radius: 5.0,
                color: ThemeToken::AxisMarker,
            },
        ];
        let svg = render_svg(&commands, 400.0, 100.0, false);
        assert!(svg.contains(r#"<g transform="translate(200 0) scale(1 1)">"#));
        assert!(svg.contains("<circle"));
        assert_eq!(svg.matches("<g").count(), svg.matches("</g>").count());
    }
}
