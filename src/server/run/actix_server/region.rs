//! Endpoints below `/{version}/{species}/genomic/region`.
//!
//! Regions are given as `chr`, `chr:pos` or `chr:start-end`, comma
//! separated.  With `histogram=true`, feature counts per `interval` sized
//! bin of the first region are returned instead of the features.

use actix_web::{
    get,
    web::{self, Data, Path},
    HttpRequest, HttpResponse,
};

use crate::db::model::IntervalFeatureFrequency;
use crate::db::region::Region;
use crate::db::{DbAdaptorFactory, DbResult};
use crate::reference::headers::HeaderTag;
use crate::server::response::params::is_true;

use super::{usage, CustomError, RequestContext, WebServerData};

/// Bin size of histograms if `interval` is absent or malformed.
pub const DEFAULT_INTERVAL: u64 = 200_000;

/// Feature types that can be queried by region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum RegionResource {
    Gene,
    Transcript,
    Exon,
    Snp,
    Cytoband,
    Sequence,
    Tfbs,
    Regulatory,
    MirnaTarget,
    Mutation,
    ConservedRegion,
    CpgIsland,
    StructuralVariation,
}

impl RegionResource {
    /// Histogram of the features in `region`, `None` if the feature type has none.
    fn interval_frequencies(
        self,
        db: &dyn DbAdaptorFactory,
        species: &str,
        version: &str,
        region: &Region,
        interval: u64,
    ) -> DbResult<Option<Vec<IntervalFeatureFrequency>>> {
        let bins = match self {
            Self::Gene => db
                .gene(species, version)?
                .get_all_interval_frequencies(region, interval)?,
            Self::Snp => db
                .snp(species, version)?
                .get_all_interval_frequencies(region, interval)?,
            Self::Tfbs => db
                .tfbs(species, version)?
                .get_all_interval_frequencies(region, interval)?,
            Self::Regulatory => db
                .regulatory_region(species, version)?
                .get_all_interval_frequencies(region, interval)?,
            Self::MirnaTarget => db
                .mirna(species, version)?
                .get_all_mirna_target_interval_frequencies(region, interval)?,
            Self::Mutation => db
                .mutation(species, version)?
                .get_all_interval_frequencies(region, interval)?,
            Self::ConservedRegion => db
                .conserved_region(species, version)?
                .get_all_interval_frequencies(region, interval)?,
            Self::CpgIsland => db
                .cpg_island(species, version)?
                .get_all_interval_frequencies(region, interval)?,
            Self::StructuralVariation => db
                .structural_variation(species, version)?
                .get_all_interval_frequencies(region, interval)?,
            Self::Transcript | Self::Exon | Self::Cytoband | Self::Sequence => return Ok(None),
        };
        Ok(Some(bins))
    }
}

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/genomic/region/{regions}/{resource}")]
async fn handle(
    data: Data<WebServerData>,
    path: Path<(String, String, String, String)>,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species, regions, resource) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    let resource = resource
        .parse::<RegionResource>()
        .map_err(|_| ctx.error(anyhow::anyhow!("resource not valid: {}", resource)))?;
    let region_list = Region::parse_list(&regions)
        .map_err(|e| ctx.error(anyhow::anyhow!("region not valid: {}", e)))?;

    if ctx.param("histogram").map(is_true).unwrap_or(false) {
        let interval = ctx
            .param("interval")
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(DEFAULT_INTERVAL);
        if let Some(region) = region_list.first() {
            tracing::debug!("histogram of {} over {} in bins of {}", resource, region, interval);
            let bins = ctx.query(|db, species, version| {
                resource.interval_frequencies(db, species, version, region, interval)
            })?;
            if let Some(bins) = bins {
                return Ok(ctx.renderer().render(&bins, None));
            }
        }
    }

    let renderer = ctx.renderer().with_query(&regions);
    let response = match resource {
        RegionResource::Gene => renderer.render(
            &ctx.query(|db, species, version| {
                db.gene(species, version)?.get_all_by_region_list(&region_list)
            })?,
            Some(HeaderTag::Gene),
        ),
        RegionResource::Transcript => renderer.render(
            &ctx.query(|db, species, version| {
                db.transcript(species, version)?
                    .get_all_by_region_list(&region_list)
            })?,
            Some(HeaderTag::Transcript),
        ),
        RegionResource::Exon => renderer.render(
            &ctx.query(|db, species, version| {
                db.exon(species, version)?.get_all_by_region_list(&region_list)
            })?,
            Some(HeaderTag::Exon),
        ),
        RegionResource::Snp => renderer.render(
            &ctx.query(|db, species, version| {
                db.snp(species, version)?.get_all_by_region_list(&region_list)
            })?,
            Some(HeaderTag::Snp),
        ),
        RegionResource::Cytoband => renderer.render(
            &ctx.query(|db, species, version| {
                db.cytoband(species, version)?
                    .get_all_by_region_list(&region_list)
            })?,
            None,
        ),
        RegionResource::Sequence => {
            let strand = ctx
                .param("strand")
                .and_then(|value| value.parse::<i8>().ok())
                .unwrap_or(1);
            renderer.render(
                &ctx.query(|db, species, version| {
                    db.genome_sequence(species, version)?
                        .get_all_by_region_list(&region_list, strand)
                })?,
                None,
            )
        }
        RegionResource::Tfbs => renderer.render(
            &ctx.query(|db, species, version| {
                db.tfbs(species, version)?.get_all_by_region_list(&region_list)
            })?,
            Some(HeaderTag::Tfbs),
        ),
        RegionResource::Regulatory => {
            let types = ctx.param_list("type");
            renderer.render(
                &ctx.query(|db, species, version| {
                    db.regulatory_region(species, version)?
                        .get_all_by_region_list(&region_list, &types)
                })?,
                Some(HeaderTag::RegulatoryRegion),
            )
        }
        RegionResource::MirnaTarget => renderer.render(
            &ctx.query(|db, species, version| {
                db.mirna(species, version)?
                    .get_all_mirna_targets_by_region_list(&region_list)
            })?,
            Some(HeaderTag::MirnaTarget),
        ),
        RegionResource::Mutation => renderer.render(
            &ctx.query(|db, species, version| {
                db.mutation(species, version)?
                    .get_all_by_region_list(&region_list)
            })?,
            Some(HeaderTag::Mutation),
        ),
        RegionResource::ConservedRegion => renderer.render(
            &ctx.query(|db, species, version| {
                db.conserved_region(species, version)?
                    .get_all_by_region_list(&region_list)
            })?,
            None,
        ),
        RegionResource::CpgIsland => renderer.render(
            &ctx.query(|db, species, version| {
                db.cpg_island(species, version)?
                    .get_all_by_region_list(&region_list)
            })?,
            None,
        ),
        RegionResource::StructuralVariation => renderer.render(
            &ctx.query(|db, species, version| {
                db.structural_variation(species, version)?
                    .get_all_by_region_list(&region_list)
            })?,
            Some(HeaderTag::StructuralVariation),
        ),
    };
    Ok(response)
}

#[allow(clippy::unused_async)]
#[get("/{version}/{species}/genomic/region/help")]
async fn handle_help(
    data: Data<WebServerData>,
    path: Path<(String, String)>,
    req: HttpRequest,
) -> actix_web::Result<HttpResponse, CustomError> {
    let (version, species) = path.into_inner();
    let ctx = RequestContext::new(&data, &req, &version, &species)?;
    Ok(ctx.renderer().render_text(usage(&[
        "/{regions}/gene",
        "/{regions}/transcript",
        "/{regions}/exon",
        "/{regions}/snp",
        "/{regions}/cytoband",
        "/{regions}/sequence?strand=",
        "/{regions}/tfbs",
        "/{regions}/regulatory?type=",
        "/{regions}/mirnatarget",
        "/{regions}/mutation",
        "/{regions}/conservedregion",
        "/{regions}/cpgisland",
        "/{regions}/structuralvariation",
        "?histogram=true&interval=",
    ])))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(handle_help).service(handle);
}
