use log::trace;

use crate::{
    authority::AuthorityManager,
    diagnostics::SyncDiagnostics,
    frame::Surrounding,
    interpolation::{catmull_rom, lerp},
    stream::{Capabilities, InterpolationMode, SyncRegistry, SyncStream},
    value::SyncValue,
    FrameId,
};

/// Reconstructs smooth playback from buffered records on every render tick.
///
/// Playback trails the render clock by `delay` frames. Streams whose entity
/// is written locally already hold live state and are skipped.
pub struct Interpolator {
    delay: f64,
}

struct Blend {
    t: f32,
    value: SyncValue,
    render_frame: FrameId,
    earliest_needed: FrameId,
}

impl Interpolator {
    pub fn new(delay: f32) -> Self {
        Self {
            delay: delay.max(0.0) as f64,
        }
    }

    pub fn delay(&self) -> f64 {
        self.delay
    }

    /// Runs one render pass at `render_frame` (fractional frames). Returns how
    /// many streams were handed a value.
    pub fn interpolate(
        &self,
        render_frame: f64,
        registry: &mut SyncRegistry,
        authority: &AuthorityManager,
        diagnostics: &mut SyncDiagnostics,
    ) -> usize {
        let target = render_frame - self.delay;
        let mut interpolated = 0;

        for stream in registry.iter_mut() {
            let mode = stream.config().interpolation_mode;
            if mode == InterpolationMode::None
                || !stream.capabilities().contains(Capabilities::INTERPOLATE)
                || authority.is_mine(&stream.entity())
            {
                continue;
            }

            let Some(blend) = Self::blend(stream, mode, target) else {
                trace!("{} has no records to interpolate yet", stream.id());
                diagnostics.record_underrun();
                let neutral = stream.config().precision.neutral_value();
                stream.handler_mut().on_interpolate(0.0, &neutral);
                interpolated += 1;
                continue;
            };

            let buffer = stream.buffer_mut();
            buffer.advance_render_cursor(blend.render_frame);
            buffer.advance_interpolation_cursor(blend.earliest_needed);

            stream.handler_mut().on_interpolate(blend.t, &blend.value);
            interpolated += 1;
        }

        interpolated
    }

    fn blend(stream: &SyncStream, mode: InterpolationMode, target: f64) -> Option<Blend> {
        let surrounding = stream.buffer().surrounding(target)?;
        let t = surrounding.blend_factor(target);
        let earliest_needed = surrounding.earliest().frame_id();

        let blend = match surrounding {
            Surrounding::Hold(record) => Blend {
                t,
                value: *record.value(),
                render_frame: record.frame_id(),
                earliest_needed,
            },
            Surrounding::Between {
                previous,
                from,
                to,
                next,
            } => {
                let value = match mode {
                    InterpolationMode::CatmullRom => catmull_rom(
                        previous.map(|record| record.value()),
                        from.value(),
                        to.value(),
                        next.map(|record| record.value()),
                        t,
                    ),
                    _ => lerp(from.value(), to.value(), t),
                };
                Blend {
                    t,
                    value,
                    render_frame: from.frame_id(),
                    earliest_needed,
                }
            }
        };

        Some(blend)
    }
}
