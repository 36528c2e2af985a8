//! Provider contract traits

use serde::de::DeserializeOwned;

/// A configuration model that providers can decode
///
/// `MODEL_NAME` is the token plugin manifests use to say which model an
/// exported provider was built for.
///
/// ```
/// use serde::Deserialize;
/// use confplug_core::ConfigModel;
///
/// #[derive(Deserialize)]
/// struct Settings {
///     name: String,
/// }
///
/// impl ConfigModel for Settings {
///     const MODEL_NAME: &'static str = "Settings";
/// }
/// ```
pub trait ConfigModel: DeserializeOwned + Send + Sync + 'static {
    const MODEL_NAME: &'static str;
}

/// A provider whose only visible state is its decoded configuration
///
/// Implementations produce the value once, at construction, and never
/// change it afterwards.
pub trait ConfigProvider<T>: Send + Sync {
    /// The decoded configuration
    fn configuration(&self) -> &T;

    /// Settings key holding the data-source location
    fn data_source_key(&self) -> &str;

    /// Provider kind (e.g. "json", "xml")
    fn kind(&self) -> &str;

    /// Consume the provider, keeping only the configuration
    fn into_configuration(self: Box<Self>) -> T;
}
