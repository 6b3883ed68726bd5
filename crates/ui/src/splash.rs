use egui::ecolor::Hsva;
use egui::{Id, LayerId, Order, Pos2};
use questlog_core::splash::{SplashConfig, SplashField};
use questlog_protocol::Point;

/// Pointer-following particle overlay painted above every page.
pub struct SplashOverlay {
    field: SplashField,
}

impl SplashOverlay {
    pub fn new(config: SplashConfig) -> Self {
        Self {
            field: SplashField::new(config),
        }
    }

    pub fn disable(&mut self) {
        self.field.clear();
    }

    /// Feed this frame's pointer input, advance and paint.
    pub fn frame(&mut self, ctx: &egui::Context) {
        let (hover, pressed, dt) = ctx.input(|i| {
            (
                i.pointer.hover_pos(),
                i.pointer.primary_pressed(),
                f64::from(i.stable_dt),
            )
        });

        match hover {
            Some(pos) => {
                let p = Point::new(f64::from(pos.x), f64::from(pos.y));
                self.field.pointer_moved(p, dt);
                if pressed {
                    self.field.pointer_pressed(p);
                }
            }
            None => self.field.pointer_left(),
        }
        self.field.step(dt);

        if self.field.is_idle() {
            return;
        }
        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("splash")));
        for splat in self.field.splats() {
            let alpha = self.field.alpha(splat) as f32;
            let color = Hsva::new(splat.hue as f32, 0.65, 1.0, alpha * 0.45);
            painter.circle_filled(
                Pos2::new(splat.position.x as f32, splat.position.y as f32),
                splat.radius as f32,
                egui::Color32::from(color),
            );
        }
        ctx.request_repaint();
    }
}
