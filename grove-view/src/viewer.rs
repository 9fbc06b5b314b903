//! Interactive word tree viewer built with eframe/egui.
//!
//! [`Viewer`] owns the grown [`Tree`], the font and the configuration, and
//! implements [`eframe::App`] to edit the input text, tweak options and draw
//! the result.

use eframe::App;
use glam::Vec2;
use grove_core::{
    config::{Config, GrowingOrder},
    content::Content,
    font::StrokeFont,
    geometry::Path,
    sprout::Sprout,
    tree::Tree,
};
use log::{info, warn};

/// Main application state for the viewer.
///
/// ### Fields
/// - `tree` - The tree currently on screen.
/// - `font` - Glyph source used for every grow.
/// - `cfg` - Options applied to the next grow.
/// - `text` - Content in the `word (group of words) word` syntax.
/// - `status` - Outcome of the last grow, shown in the status bar.
/// - `zoom`, `pan` - Camera.
pub struct Viewer {
    tree: Tree,
    font: StrokeFont,
    cfg: Config,

    text: String,
    status: Result<String, String>,

    zoom: f32,
    pan: egui::Vec2,
}

impl Viewer {
    pub fn new(cfg: Config) -> Self {
        let mut viewer = Self {
            tree: Tree::new(cfg),
            font: StrokeFont::builtin(),
            cfg,
            text: "grow (words into) trees".to_owned(),
            status: Ok(String::new()),
            zoom: 4.0,
            pan: egui::vec2(0.0, 0.0),
        };
        viewer.regrow();
        viewer
    }

    /// Grows a fresh tree from `text` with the current options.
    ///
    /// On failure the previous tree stays on screen.
    fn regrow(&mut self) {
        let mut tree = Tree::new(self.cfg);
        match self.grow_into(&mut tree) {
            Ok(()) => self.tree = tree,
            Err(msg) => self.status = Err(msg),
        }
    }

    /// Grows `text` as extra children of the current tree.
    fn grow_more(&mut self) {
        let mut tree = std::mem::replace(&mut self.tree, Tree::new(self.cfg));
        let result = self.grow_into(&mut tree);
        self.tree = tree;
        if let Err(msg) = result {
            self.status = Err(msg);
        }
    }

    fn grow_into(&mut self, tree: &mut Tree) -> Result<(), String> {
        let content = Content::parse(&self.text).map_err(|e| e.to_string())?;
        match tree.grow(&content, &self.font) {
            Ok(()) => {
                let strokes = tree.paths().len();
                info!("Grew {} children, {} strokes", tree.children().len(), strokes);
                self.status = Ok(format!("children = {}, strokes = {}", tree.children().len(), strokes));
                Ok(())
            }
            Err(e) => {
                warn!("Grow failed: {e}");
                Err(e.to_string())
            }
        }
    }

    /// Centers the tree in `rect` and zooms so it fills most of it.
    fn fit_to_view(&mut self, rect: egui::Rect) {
        let Some(bounds) = self.tree.bounds() else {
            return;
        };
        let size = Vec2::new(bounds.width(), bounds.height()).max(Vec2::ONE);
        self.zoom = (0.9 * rect.width() / size.x)
            .min(0.9 * rect.height() / size.y)
            .clamp(0.1, 50.0);
        let c = bounds.center();
        self.pan = egui::vec2(-c.x * self.zoom, -c.y * self.zoom);
    }

    /// Converts a world-space position to screen-space.
    ///
    /// Both spaces are y-down, so only zoom, pan and the centering inside
    /// `rect` apply.
    fn world_to_screen(&self, p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        let center = rect.center();
        egui::pos2(
            center.x + p.x * self.zoom + self.pan.x,
            center.y + p.y * self.zoom + self.pan.y,
        )
    }

    /// Inverse of [`Viewer::world_to_screen`].
    fn screen_to_world(&self, p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        let center = rect.center();
        Vec2::new(
            (p.x - center.x - self.pan.x) / self.zoom,
            (p.y - center.y - self.pan.y) / self.zoom,
        )
    }

    fn labeled_drag_f32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f32,
        range: std::ops::RangeInclusive<f32>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    fn labeled_drag_usize(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut usize,
        range: std::ops::RangeInclusive<usize>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Top panel: input text, grow buttons and zoom.
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let edit = ui.add(egui::TextEdit::singleline(&mut self.text).desired_width(320.0));
                let submitted = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                if ui.button("🌱 Grow").clicked() || submitted {
                    self.regrow();
                }
                if ui.button("➕ Add").clicked() {
                    self.grow_more();
                }
                if ui.button("Clear").clicked() {
                    self.tree = Tree::new(self.cfg);
                    self.status = Ok(String::new());
                }

                ui.separator();
                ui.add(egui::Slider::new(&mut self.zoom, 0.1..=50.0).text("Zoom"));
            });
        });
    }

    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| match &self.status {
                Ok(msg) => {
                    ui.label(msg);
                }
                Err(msg) => {
                    ui.colored_label(egui::Color32::LIGHT_RED, msg);
                }
            });
        });
    }

    /// Right-hand panel for growth, kerning and layout options.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Config");

                ui.separator();
                ui.label("Growth");
                let growth = &mut self.cfg.growth;
                egui::ComboBox::from_label("order")
                    .selected_text(format!("{:?}", growth.growing_order))
                    .show_ui(ui, |ui| {
                        for order in [GrowingOrder::Natural, GrowingOrder::Reversed, GrowingOrder::Randomized] {
                            ui.selectable_value(&mut growth.growing_order, order, format!("{order:?}"));
                        }
                    });
                ui.checkbox(&mut growth.start_at_trunk, "start at trunk");
                Self::labeled_drag_f32(
                    ui,
                    "branch_bottom_distance:",
                    &mut growth.branch_bottom_distance,
                    0.0..=50.0,
                    0.1,
                );
                Self::labeled_drag_usize(ui, "max_glyphs:", &mut growth.max_glyphs, 1..=4096, 1.0);

                ui.horizontal(|ui| {
                    let mut fixed = growth.seed.is_some();
                    if ui.checkbox(&mut fixed, "seed").changed() {
                        growth.seed = fixed.then(rand::random::<u64>);
                    }
                    if let Some(seed) = growth.seed.as_mut() {
                        ui.add(egui::DragValue::new(seed));
                        if ui.button("🎲").clicked() {
                            *seed = rand::random();
                        }
                    }
                });

                ui.separator();
                ui.label("Kerning");
                Self::labeled_drag_f32(ui, "padding:", &mut self.cfg.kerning.padding, 0.0..=20.0, 0.1);
                Self::labeled_drag_f32(
                    ui,
                    "resolution:",
                    &mut self.cfg.kerning.resolution,
                    0.25..=8.0,
                    0.05,
                );
                Self::labeled_drag_f32(
                    ui,
                    "stroke_width:",
                    &mut self.cfg.kerning.stroke_width,
                    0.1..=5.0,
                    0.05,
                );

                ui.separator();
                ui.label("Layout");
                Self::labeled_drag_f32(
                    ui,
                    "trunk_margin:",
                    &mut self.cfg.tree.trunk_margin,
                    0.0..=100.0,
                    0.5,
                );
                Self::labeled_drag_f32(
                    ui,
                    "trunk_width:",
                    &mut self.cfg.tree.trunk_width,
                    0.0..=20.0,
                    0.1,
                );

                ui.separator();
                if ui.button("Reset cfg to default").clicked() {
                    self.cfg = Config::default();
                }
            });
    }

    fn draw_path(&self, painter: &egui::Painter, rect: egui::Rect, path: &Path, stroke: egui::Stroke) {
        let points: Vec<egui::Pos2> = path
            .points()
            .iter()
            .map(|&p| self.world_to_screen(p, rect))
            .collect();
        if path.is_closed() {
            painter.add(egui::Shape::closed_line(points, stroke));
        } else {
            painter.add(egui::Shape::line(points, stroke));
        }
    }

    /// Central panel: draws the tree and handles pan and zoom.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            if response.dragged() {
                self.pan += response.drag_delta();
            }
            if response.double_clicked() {
                self.fit_to_view(rect);
            }

            // Zoom around the mouse cursor.
            let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                let pointer_screen = response.hover_pos().unwrap_or(rect.center());
                let world_before = self.screen_to_world(pointer_screen, rect);

                let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                self.zoom = (self.zoom * factor).clamp(0.1, 50.0);

                let screen_after = self.world_to_screen(world_before, rect);
                self.pan += pointer_screen - screen_after;
            }

            let width = (self.cfg.kerning.stroke_width * self.zoom).max(1.0);
            let ink = egui::Stroke::new(width, egui::Color32::LIGHT_GREEN);
            let wood = egui::Stroke::new(
                (self.cfg.tree.trunk_width * self.zoom).max(1.0),
                egui::Color32::from_rgb(170, 120, 70),
            );

            if let Some(trunk) = self.tree.trunk() {
                self.draw_path(&painter, rect, trunk, wood);
            }
            for path in self.tree.children().iter().flat_map(|c| c.paths()) {
                self.draw_path(&painter, rect, &path, ink);
            }
        });
    }
}

impl App for Viewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}
