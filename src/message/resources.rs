//! Messages that hand compiled resources or callbacks to the render side:
//! traffic, circles packs, drape API lines, custom symbols and postprocess
//! textures.

use super::payload::{
    CirclesPackDestination, CirclesPackRenderData, CustomSymbols, DrapeApiRenderProperty,
    FeatureId, PostprocessStaticTextures, TrafficRenderData,
};
use super::slot::Slot;
use crate::geometry::PointF;
use std::fmt;

/// Compiled traffic layer.
#[derive(Debug)]
pub struct FlushTrafficDataMessage {
    data: Slot<TrafficRenderData>,
}

impl FlushTrafficDataMessage {
    /// Create the message.
    pub const fn new(data: TrafficRenderData) -> Self {
        Self {
            data: Slot::new(data),
        }
    }

    /// Take the compiled traffic data.
    pub fn accept_traffic_data(&mut self) -> Option<TrafficRenderData> {
        self.data.accept()
    }
}

/// Compiled circles pack.
#[derive(Debug)]
pub struct FlushCirclesPackMessage {
    render_data: Slot<CirclesPackRenderData>,
    destination: CirclesPackDestination,
}

impl FlushCirclesPackMessage {
    /// Create the message.
    pub const fn new(render_data: CirclesPackRenderData, destination: CirclesPackDestination) -> Self {
        Self {
            render_data: Slot::new(render_data),
            destination,
        }
    }

    /// Take the compiled pack.
    pub fn accept_render_data(&mut self) -> Option<CirclesPackRenderData> {
        self.render_data.accept()
    }

    /// Who the pack is for.
    pub const fn destination(&self) -> CirclesPackDestination {
        self.destination
    }
}

/// Compiled drape API lines.
#[derive(Debug)]
pub struct DrapeApiFlushMessage {
    properties: Slot<Vec<DrapeApiRenderProperty>>,
}

impl DrapeApiFlushMessage {
    /// Create the message.
    pub const fn new(properties: Vec<DrapeApiRenderProperty>) -> Self {
        Self {
            properties: Slot::new(properties),
        }
    }

    /// Take the compiled lines.
    pub fn accept_properties(&mut self) -> Option<Vec<DrapeApiRenderProperty>> {
        self.properties.accept()
    }
}

/// Custom symbols to display.
#[derive(Debug)]
pub struct AddCustomSymbolsMessage {
    symbols: Slot<CustomSymbols>,
}

impl AddCustomSymbolsMessage {
    /// Create the message.
    pub const fn new(symbols: CustomSymbols) -> Self {
        Self {
            symbols: Slot::new(symbols),
        }
    }

    /// Take the symbols.
    pub fn accept_symbols(&mut self) -> Option<CustomSymbols> {
        self.symbols.accept()
    }
}

/// Features whose custom symbols changed.
#[derive(Debug)]
pub struct UpdateCustomSymbolsMessage {
    features: Slot<Vec<FeatureId>>,
}

impl UpdateCustomSymbolsMessage {
    /// Create the message.
    pub const fn new(features: Vec<FeatureId>) -> Self {
        Self {
            features: Slot::new(features),
        }
    }

    /// Take the feature list.
    pub fn accept_symbols_features(&mut self) -> Option<Vec<FeatureId>> {
        self.features.accept()
    }
}

/// Postprocess lookup textures.
#[derive(Debug)]
pub struct SetPostprocessStaticTexturesMessage {
    textures: Slot<PostprocessStaticTextures>,
}

impl SetPostprocessStaticTexturesMessage {
    /// Create the message.
    pub const fn new(textures: PostprocessStaticTextures) -> Self {
        Self {
            textures: Slot::new(textures),
        }
    }

    /// Take the textures.
    pub fn accept_textures(&mut self) -> Option<PostprocessStaticTextures> {
        self.textures.accept()
    }
}

/// Callback receiving symbol sizes, in request order.
pub type SymbolsSizeCallback = Box<dyn FnOnce(Vec<PointF>) + Send>;

/// Ask the render side for the pixel size of named symbols.
///
/// Unlike blocking messages the answer is delivered through a callback that
/// runs on the consumer thread.
pub struct RequestSymbolsSizeMessage {
    symbols: Vec<String>,
    callback: Option<SymbolsSizeCallback>,
}

impl RequestSymbolsSizeMessage {
    /// Create the request.
    pub fn new<F>(symbols: Vec<String>, callback: F) -> Self
    where
        F: FnOnce(Vec<PointF>) + Send + 'static,
    {
        Self {
            symbols,
            callback: Some(Box::new(callback)),
        }
    }

    /// Symbols to measure.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Deliver the sizes. Only the first call reaches the callback.
    pub fn invoke_callback(&mut self, sizes: Vec<PointF>) {
        if let Some(callback) = self.callback.take() {
            callback(sizes);
        }
    }
}

impl fmt::Debug for RequestSymbolsSizeMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSymbolsSizeMessage")
            .field("symbols", &self.symbols)
            .field("pending", &self.callback.is_some())
            .finish()
    }
}
