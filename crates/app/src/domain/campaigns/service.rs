//! Campaigns Service

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use flashdeal::lifecycle::{CampaignStatus, LifecycleAction, ProjectionEffect};
use jiff::Timestamp;
use mockall::automock;
use tracing::{Span, error, info};

use crate::{
    database::Db,
    domain::{
        campaigns::{
            CampaignsServiceError,
            data::{CampaignDetails, NewCampaign},
            overlap::ensure_no_overlap,
            projections::{ProjectionSynchronizer, SyncReport},
            records::{ActorUuid, Audit, CampaignRecord, CampaignUuid, Metrics, SYSTEM_ACTOR},
            repository::{CampaignsRepository, PgCampaignsRepository},
            stock::ensure_stock,
            validation::validate_details,
        },
        products::{CatalogRepository, PgCatalogRepository, records::ProductUuid},
    },
    locks::ProductLocks,
};

/// What a sweep did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Campaigns moved from scheduled to active.
    pub activated: Vec<CampaignUuid>,

    /// Campaigns moved to ended.
    pub ended: Vec<CampaignUuid>,

    /// Campaigns whose transition was saved but whose projections need reconciling.
    pub unsynced: Vec<CampaignUuid>,

    /// Campaigns the sweep could not move.
    pub failed: Vec<CampaignUuid>,
}

#[derive(Debug, Clone, Copy)]
enum SweepStep {
    Activate,
    End,
}

impl SweepReport {
    /// Record a transition attempt, returning whether the transition was saved.
    fn record(
        &mut self,
        campaign: CampaignUuid,
        step: SweepStep,
        outcome: Result<CampaignRecord, CampaignsServiceError>,
    ) -> bool {
        match outcome {
            Ok(_) => {}
            Err(CampaignsServiceError::PartialSyncFailure { .. }) => self.unsynced.push(campaign),
            Err(err) => {
                error!(campaign_uuid = %campaign, error = %err, ?step, "sweep could not move campaign");

                self.failed.push(campaign);

                return false;
            }
        }

        match step {
            SweepStep::Activate => self.activated.push(campaign),
            SweepStep::End => self.ended.push(campaign),
        }

        true
    }
}

#[derive(Clone)]
pub struct FlashDealService {
    campaigns: Arc<dyn CampaignsRepository>,
    catalog: Arc<dyn CatalogRepository>,
    projections: ProjectionSynchronizer,
    locks: ProductLocks,
}

impl fmt::Debug for FlashDealService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlashDealService")
            .field("locks", &self.locks)
            .finish_non_exhaustive()
    }
}

impl FlashDealService {
    #[must_use]
    pub fn new(campaigns: Arc<dyn CampaignsRepository>, catalog: Arc<dyn CatalogRepository>) -> Self {
        Self {
            projections: ProjectionSynchronizer::new(Arc::clone(&catalog)),
            campaigns,
            catalog,
            locks: ProductLocks::new(),
        }
    }

    /// Service backed by the `PostgreSQL` repositories.
    #[must_use]
    pub fn postgres(db: Db) -> Self {
        Self::new(
            Arc::new(PgCampaignsRepository::new(db.clone())),
            Arc::new(PgCatalogRepository::new(db)),
        )
    }

    /// Move a campaign through a pause, end or activate transition.
    ///
    /// The guard is checked once before locking so that rejected requests never wait, and again
    /// under the locks against the latest stored version.
    async fn transition(
        &self,
        campaign: CampaignUuid,
        action: LifecycleAction,
        actor: ActorUuid,
    ) -> Result<CampaignRecord, CampaignsServiceError> {
        let current = self.campaigns.find_by_id(campaign).await?;

        current.status.apply(action)?;

        let _locks = self.locks.acquire(current.products()).await;

        let latest = self.campaigns.find_by_id(campaign).await?;

        if latest.version != current.version {
            return Err(CampaignsServiceError::ConcurrentUpdate);
        }

        let status = latest.status.apply(action)?;
        let now = Timestamp::now();

        let mut next = latest;
        next.status = status;

        match action {
            LifecycleAction::Pause => {
                next.audit.paused_by = Some(actor);
                next.audit.paused_at = Some(now);
            }
            LifecycleAction::End => {
                next.audit.ended_by = Some(actor);
                next.audit.ended_at = Some(now);
            }
            LifecycleAction::Activate | LifecycleAction::Edit => {}
        }

        let saved = self.campaigns.update_status(&next).await?;

        Span::current().record("status", tracing::field::display(saved.status));

        let report = match action.projection_effect() {
            ProjectionEffect::Apply | ProjectionEffect::Replace => {
                self.projections.apply(&saved).await
            }
            ProjectionEffect::Retract => self.projections.retract(saved.uuid, saved.products()).await,
        };

        info!(campaign_uuid = %saved.uuid, status = %saved.status, "campaign transitioned");

        finish(saved, report)
    }
}

/// Turn a committed campaign and its projection report into the operation's result.
fn finish(
    campaign: CampaignRecord,
    report: SyncReport,
) -> Result<CampaignRecord, CampaignsServiceError> {
    if report.is_complete() {
        return Ok(campaign);
    }

    Err(CampaignsServiceError::PartialSyncFailure {
        campaign: Box::new(campaign),
        synced: report.synced,
        failed: report.failed,
    })
}

#[async_trait]
impl CampaignsService for FlashDealService {
    #[tracing::instrument(
        name = "campaigns.service.create_campaign",
        skip(self, campaign),
        fields(
            actor_uuid = %actor,
            campaign_uuid = %campaign.uuid,
            line_item_count = campaign.details.line_items.len()
        ),
        err
    )]
    async fn create_campaign(
        &self,
        actor: ActorUuid,
        campaign: NewCampaign,
    ) -> Result<CampaignRecord, CampaignsServiceError> {
        let now = Timestamp::now();
        let validated = validate_details(&campaign.details, campaign.discount_mode, now)?;

        let products: Vec<ProductUuid> =
            validated.line_items.iter().map(|item| item.product).collect();

        let _locks = self.locks.acquire(products.iter().copied()).await;

        ensure_no_overlap(self.campaigns.as_ref(), &products, validated.window, None).await?;
        ensure_stock(self.catalog.as_ref(), &validated.line_items, None).await?;

        let details = campaign.details;

        let record = CampaignRecord {
            uuid: campaign.uuid,
            title: details.title,
            deal_kind: details.deal_kind,
            discount_mode: campaign.discount_mode,
            window: validated.window,
            line_items: validated.line_items,
            status: CampaignStatus::Scheduled,
            visibility: details.visibility,
            limits: details.limits,
            audit: Audit::created(actor, now),
            metrics: Metrics::default(),
            version: 0,
        };

        let record = self.campaigns.insert(&record).await?;
        let report = self.projections.apply(&record).await;

        info!(campaign_uuid = %record.uuid, "created campaign");

        finish(record, report)
    }

    #[tracing::instrument(
        name = "campaigns.service.edit_campaign",
        skip(self, details),
        fields(
            actor_uuid = %actor,
            campaign_uuid = %campaign,
            line_item_count = details.line_items.len(),
            dropped_count = tracing::field::Empty
        ),
        err
    )]
    async fn edit_campaign(
        &self,
        actor: ActorUuid,
        campaign: CampaignUuid,
        details: CampaignDetails,
    ) -> Result<CampaignRecord, CampaignsServiceError> {
        let now = Timestamp::now();
        let current = self.campaigns.find_by_id(campaign).await?;

        current.status.apply(LifecycleAction::Edit)?;

        let validated = validate_details(&details, current.discount_mode, now)?;

        let products: Vec<ProductUuid> =
            validated.line_items.iter().map(|item| item.product).collect();

        let _locks = self
            .locks
            .acquire(current.products().chain(products.iter().copied()))
            .await;

        let latest = self.campaigns.find_by_id(campaign).await?;

        if latest.version != current.version {
            return Err(CampaignsServiceError::ConcurrentUpdate);
        }

        let status = latest.status.apply(LifecycleAction::Edit)?;

        ensure_no_overlap(
            self.campaigns.as_ref(),
            &products,
            validated.window,
            Some(campaign),
        )
        .await?;

        ensure_stock(self.catalog.as_ref(), &validated.line_items, Some(campaign)).await?;

        let dropped: Vec<ProductUuid> = latest
            .products()
            .filter(|product| !products.contains(product))
            .collect();

        Span::current().record("dropped_count", dropped.len());

        let edited = CampaignRecord {
            title: details.title,
            deal_kind: details.deal_kind,
            window: validated.window,
            line_items: validated.line_items,
            status,
            visibility: details.visibility,
            limits: details.limits,
            audit: Audit {
                updated_by: Some(actor),
                updated_at: Some(now),
                ..latest.audit.clone()
            },
            ..latest
        };

        let saved = self.campaigns.update(&edited).await?;
        let report = self.projections.replace(&saved, dropped).await;

        info!(campaign_uuid = %saved.uuid, "edited campaign");

        finish(saved, report)
    }

    #[tracing::instrument(
        name = "campaigns.service.pause_campaign",
        skip(self),
        fields(actor_uuid = %actor, campaign_uuid = %campaign, status = tracing::field::Empty),
        err
    )]
    async fn pause_campaign(
        &self,
        actor: ActorUuid,
        campaign: CampaignUuid,
    ) -> Result<CampaignRecord, CampaignsServiceError> {
        self.transition(campaign, LifecycleAction::Pause, actor)
            .await
    }

    #[tracing::instrument(
        name = "campaigns.service.end_campaign",
        skip(self),
        fields(actor_uuid = %actor, campaign_uuid = %campaign, status = tracing::field::Empty),
        err
    )]
    async fn end_campaign(
        &self,
        actor: ActorUuid,
        campaign: CampaignUuid,
    ) -> Result<CampaignRecord, CampaignsServiceError> {
        self.transition(campaign, LifecycleAction::End, actor).await
    }

    #[tracing::instrument(
        name = "campaigns.service.get_campaign",
        skip(self),
        fields(campaign_uuid = %campaign),
        err
    )]
    async fn get_campaign(
        &self,
        campaign: CampaignUuid,
    ) -> Result<CampaignRecord, CampaignsServiceError> {
        Ok(self.campaigns.find_by_id(campaign).await?)
    }

    #[tracing::instrument(
        name = "campaigns.service.activate_campaign",
        skip(self),
        fields(campaign_uuid = %campaign, status = tracing::field::Empty),
        err
    )]
    async fn activate_campaign(
        &self,
        campaign: CampaignUuid,
    ) -> Result<CampaignRecord, CampaignsServiceError> {
        self.transition(campaign, LifecycleAction::Activate, SYSTEM_ACTOR)
            .await
    }

    #[tracing::instrument(
        name = "campaigns.service.reconcile_projections",
        skip(self),
        fields(campaign_uuid = %campaign, status = tracing::field::Empty),
        err
    )]
    async fn reconcile_projections(
        &self,
        campaign: CampaignUuid,
    ) -> Result<CampaignRecord, CampaignsServiceError> {
        let mut locked: Vec<ProductUuid> =
            self.campaigns.find_by_id(campaign).await?.products().collect();

        // An edit may have moved the campaign onto products we have not locked yet.
        let (guard, latest) = loop {
            let guard = self.locks.acquire(locked.iter().copied()).await;
            let latest = self.campaigns.find_by_id(campaign).await?;

            if latest.products().all(|product| locked.contains(&product)) {
                break (guard, latest);
            }

            drop(guard);
            locked.extend(latest.products());
        };

        Span::current().record("status", tracing::field::display(latest.status));

        let report = if latest.status.claims_products() {
            let stale: Vec<ProductUuid> = guard
                .products()
                .filter(|product| !latest.products().any(|current| current == *product))
                .collect();

            self.projections.replace(&latest, stale).await
        } else {
            self.projections.retract(latest.uuid, guard.products()).await
        };

        info!(
            campaign_uuid = %latest.uuid,
            synced = report.synced.len(),
            failed = report.failed.len(),
            "reconciled projections"
        );

        finish(latest, report)
    }

    #[tracing::instrument(
        name = "campaigns.service.sweep",
        skip(self),
        fields(
            now = %now,
            due_count = tracing::field::Empty
        ),
        err
    )]
    async fn sweep(&self, now: Timestamp) -> Result<SweepReport, CampaignsServiceError> {
        let due = self.campaigns.find_due(now).await?;

        Span::current().record("due_count", due.len());

        let mut report = SweepReport::default();

        for campaign in due {
            let uuid = campaign.uuid;

            if campaign.status == CampaignStatus::Scheduled && campaign.window.has_started(now) {
                let outcome = self.activate_campaign(uuid).await;

                if !report.record(uuid, SweepStep::Activate, outcome) {
                    continue;
                }
            }

            if campaign.window.has_ended(now) {
                let outcome = self.end_campaign(SYSTEM_ACTOR, uuid).await;

                report.record(uuid, SweepStep::End, outcome);
            }
        }

        info!(
            activated = report.activated.len(),
            ended = report.ended.len(),
            unsynced = report.unsynced.len(),
            failed = report.failed.len(),
            "swept campaigns"
        );

        Ok(report)
    }
}

#[automock]
#[async_trait]
pub trait CampaignsService: Send + Sync {
    /// Validates and schedules a new campaign, then projects it onto its products.
    async fn create_campaign(
        &self,
        actor: ActorUuid,
        campaign: NewCampaign,
    ) -> Result<CampaignRecord, CampaignsServiceError>;

    /// Replaces a scheduled campaign's details.
    async fn edit_campaign(
        &self,
        actor: ActorUuid,
        campaign: CampaignUuid,
        details: CampaignDetails,
    ) -> Result<CampaignRecord, CampaignsServiceError>;

    /// Pauses an active campaign and retracts its projections.
    async fn pause_campaign(
        &self,
        actor: ActorUuid,
        campaign: CampaignUuid,
    ) -> Result<CampaignRecord, CampaignsServiceError>;

    /// Ends an active or paused campaign and retracts its projections.
    async fn end_campaign(
        &self,
        actor: ActorUuid,
        campaign: CampaignUuid,
    ) -> Result<CampaignRecord, CampaignsServiceError>;

    /// Retrieves a single campaign.
    async fn get_campaign(
        &self,
        campaign: CampaignUuid,
    ) -> Result<CampaignRecord, CampaignsServiceError>;

    /// Opens a scheduled campaign.
    async fn activate_campaign(
        &self,
        campaign: CampaignUuid,
    ) -> Result<CampaignRecord, CampaignsServiceError>;

    /// Re-applies or re-retracts a campaign's projections to match its status.
    async fn reconcile_projections(
        &self,
        campaign: CampaignUuid,
    ) -> Result<CampaignRecord, CampaignsServiceError>;

    /// Activates and ends every campaign whose window has opened or closed at `now`.
    async fn sweep(&self, now: Timestamp) -> Result<SweepReport, CampaignsServiceError>;
}
