pub use flecs_ecs;
use flecs_ecs::prelude::*;

pub mod name;

pub use name::Name;

/// The Plugin Trait
/// Every module (Assets, Scene, ...) must implement this.
pub trait Plugin {
    fn build(&self, app: &mut App);
}

/// The Engine Application
/// Holds the ECS World that imported models are spawned into.
pub struct App {
    pub world: World,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        let world = World::new();
        world.component::<Name>();

        Self { world }
    }

    pub fn add_plugin<P: Plugin>(&mut self, plugin: P) -> &mut Self {
        log::debug!("Building plugin {}", std::any::type_name::<P>());
        plugin.build(self);
        self
    }

    /// Stores `value` as a world singleton, replacing any previous one.
    pub fn register_singleton<T>(&mut self, value: T) -> &mut Self
    where
        T: ComponentId + DataComponent + ComponentType<Struct>,
    {
        self.world.set(value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NamePlugin;

    impl Plugin for NamePlugin {
        fn build(&self, app: &mut App) {
            app.register_singleton(Name::new("configured"));
        }
    }

    #[test]
    fn plugins_configure_the_world() {
        let mut app = App::new();
        app.add_plugin(NamePlugin);

        let name = app.world.get::<&Name>(|name| name.as_str().to_owned());
        assert_eq!(name, "configured");
    }
}
