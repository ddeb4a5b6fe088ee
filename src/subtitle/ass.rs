//! Advanced SubStation Alpha rendering.

use std::fmt::Write as _;

use super::sync::Timeline;

const PLAY_RES_X: u32 = 384;
const PLAY_RES_Y: u32 = 288;

/// Bold, Italic, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding.
const STYLE_TAIL: &str = "0,0,1,0.5,2,10,10,10,0";

/// Render a complete `.ass` document.
pub fn render_ass(timeline: &Timeline) -> String {
    let style = &timeline.style;
    let mut out = String::with_capacity(512 + timeline.events.len() * 64);

    out.push_str("[Script Info]\n");
    out.push_str("ScriptType: v4.00+\n");
    let _ = writeln!(out, "PlayResX: {PLAY_RES_X}");
    let _ = writeln!(out, "PlayResY: {PLAY_RES_Y}");
    out.push_str("ScaledBorderAndShadow: yes\n\n");

    out.push_str("[V4+ Styles]\n");
    out.push_str(
        "Format: Name, Fontname, Fontsize, PrimaryColour, Bold, Italic, \
         Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding\n",
    );
    let _ = writeln!(
        out,
        "Style: Default,{},{},{},{STYLE_TAIL}\n",
        style.font_name, style.font_size, style.primary_color
    );

    out.push_str("[Events]\n");
    out.push_str("Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n");
    for event in &timeline.events {
        let _ = writeln!(
            out,
            "Dialogue: 0,{},{},Default,,0,0,0,,{}",
            event.start, event.end, event.text
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subtitle::languages::SubtitleStyle;
    use crate::subtitle::sync::{EventKind, TimelineEvent, FILLER_TEXT};
    use reelsplice_common::AssTime;

    #[test]
    fn renders_header_style_and_events() {
        let timeline = Timeline {
            language: "kn".into(),
            style: SubtitleStyle::new("Noto Sans Kannada", 28, "&H00FFFFFF"),
            events: vec![
                TimelineEvent {
                    start: AssTime::from_centis(100),
                    end: AssTime::from_centis(200),
                    text: r"Hello\Nworld".into(),
                    kind: EventKind::Cue,
                },
                TimelineEvent {
                    start: AssTime::from_centis(200),
                    end: AssTime::from_centis(350),
                    text: FILLER_TEXT.into(),
                    kind: EventKind::Filler,
                },
            ],
        };

        let ass = render_ass(&timeline);
        assert!(ass.starts_with("[Script Info]\nScriptType: v4.00+\nPlayResX: 384\nPlayResY: 288\n"));
        assert!(ass.contains("Style: Default,Noto Sans Kannada,28,&H00FFFFFF,0,0,1,0.5,2,10,10,10,0\n"));
        assert!(ass.contains("Dialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,Hello\\Nworld\n"));
        assert!(ass.contains("Dialogue: 0,0:00:02.00,0:00:03.50,Default,,0,0,0,,{\\alpha&HFF&}\n"));

        let events_at = ass.find("[Events]").unwrap();
        assert!(ass.find("[V4+ Styles]").unwrap() < events_at);
        assert_eq!(ass.matches("Dialogue:").count(), 2);
    }
}
