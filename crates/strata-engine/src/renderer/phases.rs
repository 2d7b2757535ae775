// renderer/phases.rs
//
// The frame is split into eleven phases chained after `OnUpdate`, one per
// stage of a raster frame: update, begin drawing, clear, 3D mode, GUI, 2D
// overlay, end drawing. Systems drop into the phase they draw in.

use crate::core::error::Result;
use crate::ecs::{PhaseId, SystemContext, World};
use crate::gui::Gui;
use crate::input::InputState;

use super::camera::MainContext;
use super::color::Color;
use super::draw::{DrawCommand, DrawList};

/// Singleton: background color used by `render_2d_background_color_system`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearColor(pub Color);

impl Default for ClearColor {
    fn default() -> Self {
        Self(Color::RAYWHITE)
    }
}

/// Handles to the render phases, also stored as a singleton by `install`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderPhases {
    pub update: PhaseId,
    pub begin_drawing: PhaseId,
    pub start_render: PhaseId,
    pub begin_mode_3d: PhaseId,
    pub render_3d: PhaseId,
    pub end_mode_3d: PhaseId,
    pub gui_begin: PhaseId,
    pub gui_render: PhaseId,
    pub gui_end: PhaseId,
    pub render_2d: PhaseId,
    pub end_drawing: PhaseId,
}

pub const RENDER_PHASE_NAMES: [&str; 11] = [
    "Update",
    "BeginDrawing",
    "StartRender",
    "BeginMode3D",
    "Render3D",
    "EndMode3D",
    "GuiBegin",
    "GuiRender",
    "GuiEnd",
    "Render2D",
    "EndDrawing",
];

impl RenderPhases {
    /// Register the phases, each depending on the one before it, with
    /// `Update` depending on `OnUpdate`.
    pub fn install(world: &mut World) -> Result<Self> {
        let mut ids = [PhaseId::ON_UPDATE; 11];
        let mut previous = PhaseId::ON_UPDATE;
        for (slot, name) in ids.iter_mut().zip(RENDER_PHASE_NAMES) {
            let id = world.add_phase(name)?;
            world.depends_on(id, previous)?;
            *slot = id;
            previous = id;
        }
        let [update, begin_drawing, start_render, begin_mode_3d, render_3d, end_mode_3d, gui_begin, gui_render, gui_end, render_2d, end_drawing] =
            ids;
        let phases = Self {
            update,
            begin_drawing,
            start_render,
            begin_mode_3d,
            render_3d,
            end_mode_3d,
            gui_begin,
            gui_render,
            gui_end,
            render_2d,
            end_drawing,
        };
        world.set(phases);
        log::debug!("render phases installed");
        Ok(phases)
    }

    /// Register the frame-structure systems every rendering demo needs.
    pub fn install_default_systems(&self, world: &mut World) -> Result<()> {
        world.add_system("begin_drawing_system", self.begin_drawing, begin_drawing_system)?;
        world.add_system(
            "render_2d_background_color_system",
            self.start_render,
            render_2d_background_color_system,
        )?;
        world.add_system(
            "begin_camera_mode_3d_system",
            self.begin_mode_3d,
            begin_camera_mode_3d_system,
        )?;
        world.add_system(
            "end_camera_mode_3d_system",
            self.end_mode_3d,
            end_camera_mode_3d_system,
        )?;
        world.add_system("gui_begin_system", self.gui_begin, gui_begin_system)?;
        world.add_system("gui_end_system", self.gui_end, gui_end_system)?;
        world.add_system("end_drawing_system", self.end_drawing, end_drawing_system)?;
        Ok(())
    }
}

pub fn begin_drawing_system(ctx: &mut SystemContext<'_>) {
    let Some(mut list) = ctx.singleton_mut::<DrawList>() else { return };
    list.begin_drawing();
}

pub fn render_2d_background_color_system(ctx: &mut SystemContext<'_>) {
    let color = ctx
        .singleton::<ClearColor>()
        .map(|c| c.0)
        .unwrap_or(Color::RAYWHITE);
    let Some(mut list) = ctx.singleton_mut::<DrawList>() else { return };
    list.push(DrawCommand::Clear(color));
}

pub fn begin_camera_mode_3d_system(ctx: &mut SystemContext<'_>) {
    let Some(main) = ctx.singleton::<MainContext>() else {
        log::trace!("{}: no MainContext, skip", ctx.name());
        return;
    };
    let Some(mut list) = ctx.singleton_mut::<DrawList>() else { return };
    list.push(DrawCommand::BeginMode3D(main.camera));
}

pub fn end_camera_mode_3d_system(ctx: &mut SystemContext<'_>) {
    if !ctx.has::<MainContext>() {
        log::trace!("{}: no MainContext, skip", ctx.name());
        return;
    }
    let Some(mut list) = ctx.singleton_mut::<DrawList>() else { return };
    list.push(DrawCommand::EndMode3D);
}

pub fn gui_begin_system(ctx: &mut SystemContext<'_>) {
    let Some(input) = ctx.singleton::<InputState>() else { return };
    let Some(mut gui) = ctx.singleton_mut::<Gui>() else { return };
    gui.begin_frame(&input);
}

pub fn gui_end_system(ctx: &mut SystemContext<'_>) {
    let Some(mut gui) = ctx.singleton_mut::<Gui>() else { return };
    let commands = gui.end_frame();
    let Some(mut list) = ctx.singleton_mut::<DrawList>() else { return };
    list.extend(commands);
}

pub fn end_drawing_system(ctx: &mut SystemContext<'_>) {
    let Some(mut list) = ctx.singleton_mut::<DrawList>() else { return };
    list.end_drawing();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::camera::Camera3D;

    fn world_with_phases() -> (World, RenderPhases) {
        let mut world = World::new();
        world.set(DrawList::new());
        world.set(InputState::new());
        world.set(Gui::new());
        let phases = RenderPhases::install(&mut world).unwrap();
        phases.install_default_systems(&mut world).unwrap();
        (world, phases)
    }

    #[test]
    fn phases_run_in_frame_order() {
        let (mut world, _) = world_with_phases();
        let order = world.pipeline().phase_order().unwrap();
        let names: Vec<&str> = order
            .iter()
            .filter_map(|&id| world.pipeline().phase_name(id))
            .skip_while(|&n| n != "OnUpdate")
            .collect();
        let mut expected = vec!["OnUpdate"];
        expected.extend(RENDER_PHASE_NAMES);
        // OnValidate..OnStore follow OnUpdate too, so compare relative order only.
        let filtered: Vec<&str> = names.into_iter().filter(|n| expected.contains(n)).collect();
        assert_eq!(filtered, expected);

        assert!(world.get::<RenderPhases>().is_some());
        assert_eq!(world.progress(0.016).unwrap(), 7);
    }

    #[test]
    fn frame_with_camera_draws_3d_block() {
        let (mut world, phases) = world_with_phases();
        world.set(MainContext {
            camera: Camera3D::default(),
        });
        world.set(ClearColor(Color::BLACK));
        world
            .add_system("cube", phases.render_3d, |ctx| {
                if let Some(mut list) = ctx.singleton_mut::<DrawList>() {
                    list.cube_wires(glam::Vec3::ZERO, glam::Vec3::splat(2.0), Color::MAROON);
                }
            })
            .unwrap();
        world.progress(0.016).unwrap();

        let list = world.get::<DrawList>().unwrap();
        assert_eq!(list.commands()[0], DrawCommand::Clear(Color::BLACK));
        assert!(matches!(list.commands()[1], DrawCommand::BeginMode3D(_)));
        assert!(matches!(list.commands()[2], DrawCommand::CubeWires { .. }));
        assert_eq!(list.commands()[3], DrawCommand::EndMode3D);
        assert_eq!(list.validate(), Ok(()));
        assert_eq!(list.frames_drawn(), 1);
    }

    #[test]
    fn missing_camera_skips_3d_mode() {
        let (mut world, _) = world_with_phases();
        world.progress(0.016).unwrap();
        let list = world.get::<DrawList>().unwrap();
        assert_eq!(list.commands(), &[DrawCommand::Clear(Color::RAYWHITE)]);
    }

    #[test]
    fn installing_twice_is_rejected() {
        let (mut world, _) = world_with_phases();
        assert!(RenderPhases::install(&mut world).is_err());
    }
}
