use std::{cell::RefCell, path::PathBuf, rc::Rc};

use anyhow::Result;
use clap::Parser;
use settings::{load_settings, save_settings, ToolSettings};
use shared::domain::{TargetId, TransparencyValue};
use transparency::{
    launcher::{run_tool, LayerStack, MessageBar, SettingsStore, ToolOutcome},
    SessionEvent, Target, TargetError,
};

#[derive(Parser, Debug)]
struct Args {
    /// Transparency percents to scrub through before the final action.
    #[arg(long, value_delimiter = ',')]
    scrub: Vec<u8>,
    /// Final transparency percent to commit; omit to cancel instead.
    #[arg(long)]
    set: Option<u8>,
    /// Names of layers to treat as the current selection.
    #[arg(long, value_delimiter = ',')]
    select: Vec<String>,
    /// Override the persisted live-preview flag for this run.
    #[arg(long)]
    preview: Option<bool>,
    /// Settings file carrying the last-used value between runs.
    #[arg(long, default_value = "./data/transparency.toml")]
    settings: PathBuf,
}

struct LayerState {
    opacity: f64,
    repaints: u32,
}

/// In-memory stand-in for a host layer; cloning hands out another handle
/// onto the same layer.
#[derive(Clone)]
struct MemoryLayer {
    id: TargetId,
    name: String,
    state: Rc<RefCell<LayerState>>,
}

impl MemoryLayer {
    fn new(id: i64, name: &str, opacity: f64) -> Self {
        Self {
            id: TargetId(id),
            name: name.to_string(),
            state: Rc::new(RefCell::new(LayerState {
                opacity,
                repaints: 0,
            })),
        }
    }

    fn current_opacity(&self) -> f64 {
        self.state.borrow().opacity
    }

    fn repaints(&self) -> u32 {
        self.state.borrow().repaints
    }
}

impl Target for MemoryLayer {
    fn id(&self) -> TargetId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn opacity(&self) -> Result<f64, TargetError> {
        Ok(self.state.borrow().opacity)
    }

    fn set_opacity(&mut self, opacity: f64) -> Result<(), TargetError> {
        self.state.borrow_mut().opacity = opacity;
        Ok(())
    }

    fn trigger_repaint(&mut self) {
        self.state.borrow_mut().repaints += 1;
    }
}

struct MemoryProject {
    layers: Vec<MemoryLayer>,
    selected_names: Vec<String>,
}

impl LayerStack for MemoryProject {
    type Layer = MemoryLayer;

    fn all_layers(&self) -> Vec<MemoryLayer> {
        self.layers.clone()
    }

    fn selected_layers(&self) -> Vec<MemoryLayer> {
        self.layers
            .iter()
            .filter(|layer| self.selected_names.iter().any(|name| name == layer.name()))
            .cloned()
            .collect()
    }
}

struct FileSettingsStore {
    path: PathBuf,
    preview_override: Option<bool>,
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> Result<ToolSettings> {
        let mut settings = load_settings(&self.path);
        if let Some(preview) = self.preview_override {
            settings.preview_enabled = preview;
        }
        Ok(settings)
    }

    fn store(&mut self, settings: &ToolSettings) -> Result<()> {
        save_settings(&self.path, settings)
    }
}

struct StdoutMessageBar;

impl MessageBar for StdoutMessageBar {
    fn warn(&mut self, title: &str, message: &str) {
        println!("[warn] {title}: {message}");
    }

    fn success(&mut self, title: &str, message: &str) {
        println!("[ok] {title}: {message}");
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let project = MemoryProject {
        layers: vec![
            MemoryLayer::new(1, "Basemap", 1.0),
            MemoryLayer::new(2, "Parcels", 0.8),
            MemoryLayer::new(3, "Labels", 0.6),
        ],
        selected_names: args.select,
    };

    let mut events: Vec<SessionEvent> = args
        .scrub
        .iter()
        .map(|&percent| SessionEvent::ValueChanged(TransparencyValue::clamped(percent)))
        .collect();
    events.push(match args.set {
        Some(percent) => SessionEvent::Confirmed(TransparencyValue::clamped(percent)),
        None => SessionEvent::Cancelled,
    });

    let mut store = FileSettingsStore {
        path: args.settings,
        preview_override: args.preview,
    };
    let mut bar = StdoutMessageBar;

    match run_tool(&project, &mut store, &mut bar, events)? {
        ToolOutcome::NoLayers => {}
        ToolOutcome::Cancelled => println!("Session cancelled; layers untouched."),
        ToolOutcome::Committed(result) => println!(
            "Committed {}% across {} layer(s).",
            result.final_value.percent(),
            result.target_count
        ),
    }

    for layer in &project.layers {
        println!(
            "{:<10} opacity {:.2} ({} repaint(s))",
            layer.name(),
            layer.current_opacity(),
            layer.repaints()
        );
    }

    Ok(())
}
