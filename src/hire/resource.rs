//! Resource namespaces
//!
//! A [`Resource`] is a thin handle naming one catalog resource. It adds no
//! behaviour of its own: every method forwards to [`Hire::invoke`] or
//! [`Hire::pages`].

use super::Hire;
use crate::catalog::Endpoint;
use crate::envelope::ApiResponse;
use crate::error::Result;
use crate::pagination::PageStream;
use crate::payload::{Payload, RequestOptions};

/// Operations of one resource, e.g. `hire.offer()`
#[derive(Debug, Clone, Copy)]
pub struct Resource<'a> {
    hire: &'a Hire,
    name: &'a str,
}

impl<'a> Resource<'a> {
    pub(super) fn new(hire: &'a Hire, name: &'a str) -> Self {
        Self { hire, name }
    }

    /// Resource name as used in the catalog
    pub fn name(&self) -> &str {
        self.name
    }

    /// Catalog entries of this resource
    pub fn operations(&self) -> Vec<&'a Endpoint> {
        self.hire.catalog().operations(self.name)
    }

    /// Call an operation
    pub async fn call(&self, operation: &str, payload: Payload) -> Result<ApiResponse> {
        self.call_with(operation, payload, RequestOptions::default())
            .await
    }

    /// Call an operation with per-call options
    pub async fn call_with(
        &self,
        operation: &str,
        payload: Payload,
        options: RequestOptions,
    ) -> Result<ApiResponse> {
        self.hire
            .invoke(self.name, operation, &payload, &options)
            .await
    }

    /// `create`
    pub async fn create(&self, payload: Payload) -> Result<ApiResponse> {
        self.call("create", payload).await
    }

    /// `get`
    pub async fn get(&self, payload: Payload) -> Result<ApiResponse> {
        self.call("get", payload).await
    }

    /// `list`, a single page
    pub async fn list(&self, payload: Payload) -> Result<ApiResponse> {
        self.call("list", payload).await
    }

    /// `patch`
    pub async fn patch(&self, payload: Payload) -> Result<ApiResponse> {
        self.call("patch", payload).await
    }

    /// `update`
    pub async fn update(&self, payload: Payload) -> Result<ApiResponse> {
        self.call("update", payload).await
    }

    /// `delete`
    pub async fn delete(&self, payload: Payload) -> Result<ApiResponse> {
        self.call("delete", payload).await
    }

    /// Every page of `list`
    pub fn list_with_iterator(&self, payload: Payload) -> PageStream {
        self.pages("list", payload, RequestOptions::default())
    }

    /// Every page of any paginated operation
    pub fn pages(&self, operation: &str, payload: Payload, options: RequestOptions) -> PageStream {
        self.hire.pages(self.name, operation, &payload, &options)
    }
}

macro_rules! resources {
    ($($name:ident),* $(,)?) => {
        /// Accessors for the resources of the built-in catalog
        impl Hire {
            $(
                #[doc = concat!("Operations of `", stringify!($name), "`")]
                pub fn $name(&self) -> Resource<'_> {
                    Resource::new(self, stringify!($name))
                }
            )*
        }
    };
}

resources! {
    agency,
    application,
    application_interview,
    attachment,
    ehr_import_task,
    employee,
    evaluation,
    interview,
    interview_record,
    job,
    job_manager,
    job_process,
    job_requirement,
    job_requirement_schema,
    job_schema,
    job_type,
    location,
    note,
    offer,
    offer_schema,
    questionnaire,
    referral,
    referral_account,
    referral_website_job_post,
    registration_schema,
    resume_source,
    role,
    subject,
    talent,
    talent_folder,
    talent_object,
    termination_reason,
    user_role,
    website,
    website_channel,
    website_delivery,
    website_job_post,
}
