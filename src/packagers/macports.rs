//! MacPorts portfiles.
//!
//! MacPorts checksums every distfile with RMD160 in addition to SHA-256,
//! and app bundles installed from native packages need an `appName`.

use crate::core::distribution::DistributionType;
use crate::packagers::capabilities::{BackendSpec, PackagerKind};
use crate::util::hash::Algorithm;

/// Extra-property key holding the `.app` bundle name.
pub const APP_NAME: &str = "appName";

pub const SPEC: BackendSpec = BackendSpec {
    kind: PackagerKind::Macports,
    description: "MacPorts portfiles pushed to a ports repository",
    distribution_types: &[
        (DistributionType::JavaBinary, &[".zip", ".tar.gz"]),
        (DistributionType::Jlink, &[".zip", ".tar.gz"]),
        (DistributionType::NativeImage, &[".zip", ".tar.gz"]),
        (DistributionType::Binary, &[".zip", ".tar.gz"]),
        (DistributionType::NativePackage, &[".dmg", ".pkg", ".zip"]),
    ],
    platforms: &["osx", "macos", "darwin"],
    checksum: Some(Algorithm::Rmd160),
    default_revision: 0,
    default_categories: &["devel"],
    app_name_key: Some(APP_NAME),
    repository_name: "macports",
    repository_required: false,
    requires_release: true,
};
