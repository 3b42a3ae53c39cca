// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Intelligence Source Adapters
 * One adapter per external subdomain intelligence provider
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::errors::ReconResult;
use crate::types::{Domain, SourceHits, SourceKind};
use async_trait::async_trait;

pub mod crtsh;
pub mod dns_probe;
pub mod dnsdumpster;
pub mod netcraft;
pub mod search_engines;
pub mod threat_intel;

pub use crtsh::CertTransparencySource;
pub use dns_probe::DnsProbeSource;
pub use dnsdumpster::DnsDumpsterSource;
pub use netcraft::NetcraftSource;
pub use search_engines::SearchEngineSource;
pub use threat_intel::{PassiveDnsSource, ThreatCrowdSource, VirusTotalSource};

/// One external intelligence provider queried for hostnames.
///
/// `fetch` returns the adapter's classified contribution or an error; it is
/// the orchestrator's fan-in that absorbs failures to zero results, so a
/// failing source can never abort the overall discovery. Every adapter runs
/// its raw extraction through [`crate::classifier::classify`] before
/// returning, keeping the admission rule uniform across providers.
#[async_trait]
pub trait Source: Send + Sync {
    fn kind(&self) -> SourceKind;

    async fn fetch(&self, domain: &Domain) -> ReconResult<SourceHits>;
}
