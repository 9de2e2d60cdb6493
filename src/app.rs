//
// Copyright 2022-Present (c) Raja Lehtihet & Wael El Oraiby
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice,
// this list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
// this list of conditions and the following disclaimer in the documentation
// and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its contributors
// may be used to endorse or promote products derived from this software without
// specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE
// ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE
// LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR
// CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF
// SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS
// INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN
// CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE)
// ARISING IN ANY WAY OUT OF THE USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE
// POSSIBILITY OF SUCH DAMAGE.
//
use std::any::Any;

use log::{info, warn};

use crate::registry::ApiRegistry;

/// Opaque application state carried across module reloads.
pub type AppState = Box<dyn Any>;

/// The frame-loop contract a hosted application implements.
///
/// The host calls, in order per process lifetime: [`AppModule::load`] (with
/// the prior state on a reload), then [`AppModule::resize`] /
/// [`AppModule::update`] per event/frame, and finally
/// [`AppModule::shutdown`]. `load` must tolerate a `Some` prior state.
pub trait AppModule {
    /// Called once after the module is loaded. On reload the previous state
    /// is handed back unchanged.
    fn load(&mut self, registry: &mut ApiRegistry, prior: Option<AppState>) -> AppState;

    /// Called before the module is unloaded for good.
    fn shutdown(&mut self, state: &mut AppState);

    /// Called when the viewport size changes.
    fn resize(&mut self, state: &mut AppState);

    /// Called once per frame.
    fn update(&mut self, state: &mut AppState);
}

/// Source of application modules. The shared-library loader implements this
/// over `dlopen`; tests link modules statically via [`StaticModuleLoader`].
pub trait ModuleLoader {
    /// Loads (or reloads) the module. `None` on failure.
    fn load_module(&mut self) -> Option<Box<dyn AppModule>>;

    /// Returns `true` when the most recent load succeeded.
    fn valid(&self) -> bool;
}

/// Module loader over a statically linked factory, for hosts and tests that
/// do not hot reload.
pub struct StaticModuleLoader {
    factory: Box<dyn FnMut() -> Box<dyn AppModule>>,
    valid: bool,
}

impl StaticModuleLoader {
    /// Creates a loader that produces modules from `factory`.
    pub fn new(factory: Box<dyn FnMut() -> Box<dyn AppModule>>) -> Self { Self { factory, valid: false } }
}

impl ModuleLoader for StaticModuleLoader {
    fn load_module(&mut self) -> Option<Box<dyn AppModule>> {
        let module = (self.factory)();
        self.valid = true;
        Some(module)
    }

    fn valid(&self) -> bool { self.valid }
}

/// Drives an application module through the load / update / resize /
/// shutdown contract and carries its state across reloads.
pub struct AppHost {
    registry: ApiRegistry,
    loader: Box<dyn ModuleLoader>,
    module: Option<Box<dyn AppModule>>,
    state: Option<AppState>,
}

impl AppHost {
    /// Creates a host around a module loader.
    pub fn new(loader: Box<dyn ModuleLoader>) -> Self {
        Self {
            registry: ApiRegistry::new(),
            loader,
            module: None,
            state: None,
        }
    }

    /// The registry modules publish and fetch APIs through.
    pub fn registry(&mut self) -> &mut ApiRegistry { &mut self.registry }

    /// Loads the module, or reloads it passing the prior state back. Returns
    /// `false` when the loader failed; the previous module keeps running.
    pub fn load(&mut self) -> bool {
        match self.loader.load_module() {
            Some(mut module) => {
                let prior = self.state.take();
                let reload = prior.is_some();
                self.state = Some(module.load(&mut self.registry, prior));
                self.module = Some(module);
                info!("app module {}", if reload { "reloaded" } else { "loaded" });
                true
            }
            None => {
                warn!("app module load failed, keeping previous module");
                false
            }
        }
    }

    /// Forwards a viewport resize to the module.
    pub fn resize(&mut self) {
        if let (Some(module), Some(state)) = (&mut self.module, &mut self.state) {
            module.resize(state);
        }
    }

    /// Runs one frame of the module.
    pub fn update(&mut self) {
        if let (Some(module), Some(state)) = (&mut self.module, &mut self.state) {
            module.update(state);
        }
    }

    /// Shuts the module down and drops its state.
    pub fn shutdown(&mut self) {
        if let (Some(module), Some(state)) = (&mut self.module, &mut self.state) {
            module.shutdown(state);
        }
        self.module = None;
        self.state = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    struct Counter;

    impl AppModule for Counter {
        fn load(&mut self, registry: &mut ApiRegistry, prior: Option<AppState>) -> AppState {
            registry.add("EMBER_API_COUNTER", Rc::new(()));
            match prior {
                Some(state) => state,
                None => Box::new(0u32),
            }
        }

        fn shutdown(&mut self, state: &mut AppState) {
            let count = state.downcast_ref::<u32>().unwrap();
            assert!(*count > 0);
        }

        fn resize(&mut self, _state: &mut AppState) {}

        fn update(&mut self, state: &mut AppState) {
            *state.downcast_mut::<u32>().unwrap() += 1;
        }
    }

    #[test]
    fn state_survives_reload() {
        let mut host = AppHost::new(Box::new(StaticModuleLoader::new(Box::new(|| Box::new(Counter)))));
        assert!(host.load());
        host.update();
        host.update();

        // reload: the prior state is passed back unchanged
        assert!(host.load());
        host.update();
        assert_eq!(*host.state.as_ref().unwrap().downcast_ref::<u32>().unwrap(), 3);
        host.shutdown();
        assert!(host.state.is_none());
    }
}
