use console::Style;
use nebula_core::geometry::{Point, Rect};
use nebula_core::session::{EventOutcome, SessionSnapshot};

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    enabled: Style,
    disabled: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            enabled: Style::new().green(),
            disabled: Style::new().dim().yellow(),
        }
    }

    fn flag(&self, on: bool) -> String {
        if on {
            self.enabled.apply_to("locked").to_string()
        } else {
            self.disabled.apply_to("free").to_string()
        }
    }
}

fn fmt_point(p: Point) -> String {
    format!("({:.2}, {:.2})", p.x, p.y)
}

fn fmt_rect(r: Rect) -> String {
    format!("{} .. {}", fmt_point(r.min), fmt_point(r.max))
}

pub fn print_session_summary(snapshot: &SessionSnapshot, outcomes: &[EventOutcome]) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Nebula Session"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(14)));
    println!();

    println!(
        "  {:<14}zoom {}  pan {}",
        s.label.apply_to("Sync"),
        s.flag(snapshot.policy.zoom_locked),
        s.flag(snapshot.policy.pan_locked)
    );

    let (mut zooms, mut pans, mut fixes, mut moves) = (0, 0, 0, 0);
    for outcome in outcomes {
        match outcome {
            EventOutcome::Zoomed { .. } => zooms += 1,
            EventOutcome::Panned { .. } => pans += 1,
            EventOutcome::MarkerFixed(_) => fixes += 1,
            EventOutcome::LiveMoved(_) => moves += 1,
        }
    }
    println!(
        "  {:<14}{} zoom, {} pan, {} click, {} move",
        s.label.apply_to("Events"),
        s.value.apply_to(zooms),
        s.value.apply_to(pans),
        s.value.apply_to(fixes),
        s.value.apply_to(moves)
    );

    let reticle = &snapshot.reticle;
    let shown = if reticle.visible {
        s.enabled.apply_to("shown")
    } else {
        s.disabled.apply_to("hidden")
    };
    println!(
        "  {:<14}{} at {:.1} opacity, {}",
        s.label.apply_to("Reticle"),
        s.value.apply_to(reticle.color),
        reticle.opacity,
        shown
    );

    for vp in &snapshot.viewports {
        println!();
        let name = vp.name.as_deref().unwrap_or("unnamed");
        println!("  {} {}", s.header.apply_to(format!("Viewport {}", vp.id)), name);
        println!(
            "  {:<14}{}x{} px @ {} px/unit",
            s.label.apply_to("Image"),
            vp.pixel_width,
            vp.pixel_height,
            vp.scale
        );
        if vp.offset != Point::ORIGIN {
            println!("  {:<14}{}", s.label.apply_to("Offset"), fmt_point(vp.offset));
        }
        println!(
            "  {:<14}{}x{}",
            s.label.apply_to("Screen"),
            vp.screen_size.width,
            vp.screen_size.height
        );
        println!(
            "  {:<14}{}",
            s.label.apply_to("Zoom"),
            s.value.apply_to(format!("{:.4}", vp.zoom))
        );
        println!("  {:<14}{}", s.label.apply_to("Pan"), fmt_point(vp.pan));
        println!(
            "  {:<14}{}",
            s.label.apply_to("Visible"),
            fmt_rect(vp.visible_logical_rect)
        );
        if !vp.synced {
            println!("  {:<14}{}", s.label.apply_to("Sync"), s.disabled.apply_to("detached"));
        }
        for marker in &vp.projected {
            let place = if marker.on_screen {
                s.enabled.apply_to(fmt_point(marker.screen))
            } else {
                s.disabled.apply_to(format!("{} off-screen", fmt_point(marker.screen)))
            };
            println!("  {:<14}{}", s.label.apply_to(marker.kind.to_string()), place);
        }
    }

    if !snapshot.markers.is_empty() {
        println!();
        println!("  {}", s.header.apply_to("Markers"));
        for marker in &snapshot.markers {
            let label = marker.label.as_deref().unwrap_or("");
            println!(
                "  {:<14}{} {} {}",
                s.label.apply_to(marker.kind.to_string()),
                fmt_point(marker.position),
                s.value.apply_to(marker.color),
                label
            );
        }
    }
    println!();
}
