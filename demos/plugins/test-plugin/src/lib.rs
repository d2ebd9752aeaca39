//! Test plugin registering one extension of each simulation kind

use cece::plugin::{Api, RepositoryRecord};
use cece::simulation::{Initializer, Module, Object, ObjectType, Program, Real, Simulation};
use serde_yaml::Value;

#[derive(Default)]
struct Seed;

impl Initializer for Seed {
    fn call(&self, simulation: &mut Simulation) -> anyhow::Result<()> {
        simulation.set_parameter("seeded", 1.0);
        Ok(())
    }
}

#[derive(Default)]
struct Clock {
    elapsed: Real,
}

impl Module for Clock {
    fn update(&mut self, dt: Real) -> anyhow::Result<()> {
        self.elapsed += dt;
        Ok(())
    }

    fn store_config(&self) -> Value {
        Value::from(self.elapsed)
    }
}

#[derive(Default)]
struct Particle {
    age: Real,
}

impl Object for Particle {
    fn type_name(&self) -> &str {
        "object"
    }

    fn update(&mut self, dt: Real) -> anyhow::Result<()> {
        self.age += dt;
        Ok(())
    }
}

#[derive(Default)]
struct Tick;

impl Program for Tick {
    fn call(&mut self, object: &mut dyn Object, dt: Real) -> anyhow::Result<()> {
        object.update(dt)
    }
}

#[derive(Default)]
pub struct TestApi;

impl Api for TestApi {
    fn on_load(&self, record: &mut RepositoryRecord) {
        record
            .register_initializer::<Seed>("initializer")
            .register_module::<Clock>("module")
            .register_object::<Particle>("object")
            .register_program::<Tick>("program");
    }

    fn on_unload(&self, record: &mut RepositoryRecord) {
        record
            .unregister_initializer("initializer")
            .unregister_module("module")
            .unregister_object("object")
            .unregister_program("program");
    }

    fn on_import(&self, simulation: &mut Simulation, config: &Value) {
        simulation.add_object_type(ObjectType {
            name: "object.fast".to_string(),
            base: "object".to_string(),
            config: config.clone(),
        });
    }

    fn on_remove(&self, simulation: &mut Simulation) {
        simulation.remove_object_types_of("object");
    }
}

cece::define_plugin!(TestApi);
