//! Named collection of tours.
//!
//! Every walkthrough shipped with the product is a plain [`Tour`] value built
//! here; hosts may add more from JSON.

use std::{collections::BTreeMap, path::Path};

use crate::{
    error::{Result, TourError},
    models::{FieldPredicate, Side, SideEffect, Step, Tour},
};

/// Tours indexed by id.
#[derive(Debug, Clone, Default)]
pub struct TourCatalog {
    tours: BTreeMap<String, Tour>,
}

impl TourCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in walkthroughs.
    ///
    /// # Errors
    ///
    /// Returns `TourError::InvalidStepModel` if a built-in definition is
    /// malformed.
    pub fn builtin() -> Result<Self> {
        let mut catalog = Self::new();
        for tour in [
            organization_setup()?,
            team_invite()?,
            category_setup()?,
            product_tutorial()?,
            user_homepage()?,
        ] {
            catalog.insert(tour);
        }
        Ok(catalog)
    }

    /// Parses a JSON array of tour definitions.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let tours: Vec<Tour> = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        for tour in tours {
            catalog.insert(tour);
        }
        Ok(catalog)
    }

    /// Reads a JSON array of tour definitions from a file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| TourError::FileSystem {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json_str(&json)
    }

    /// Adds a tour, replacing any tour with the same id.
    pub fn insert(&mut self, tour: Tour) -> Option<Tour> {
        self.tours.insert(tour.id().to_string(), tour)
    }

    /// Adds every tour of `other`, replacing tours with the same id.
    pub fn extend(&mut self, other: TourCatalog) {
        self.tours.extend(other.tours);
    }

    pub fn get(&self, id: &str) -> Option<&Tour> {
        self.tours.get(id)
    }

    /// Like [`TourCatalog::get`], but an unknown id is an error.
    pub fn require(&self, id: &str) -> Result<&Tour> {
        self.get(id).ok_or_else(|| TourError::UnknownTour { id: id.to_string() })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tour> {
        self.tours.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.tours.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tours.is_empty()
    }
}

fn organization_setup() -> Result<Tour> {
    Tour::builder("organization-setup", "Set up your organization")
        .description("Logo, sub-organizations and organization details")
        .step(
            Step::new(
                "edit-details",
                "Let's Start!",
                "Welcome! Let's set up your organization. We'll start with the basics: adding a \
                 logo and configuring your organization information. Click 'Edit details' to \
                 get started.",
            )
            .at("btn-edit", Side::Bottom)
            .on_target_click(),
        )
        .step(
            Step::new(
                "upload-logo",
                "Upload Organization Logo",
                "Click the 'Upload photo' button to add a logo for your organization. You can \
                 also change the organization name and sub-organization naming here.",
            )
            .at("btn-upload-photo", Side::Bottom)
            .on_target_click()
            .skippable(true),
        )
        .step(
            Step::new(
                "sub-organization",
                "Create Sub-organization",
                "You can create separate workspaces for departments, teams, or clients. Each \
                 sub-organization will have independent permissions and data.",
            )
            .at("btn-new-org", Side::Top)
            .on_target_click()
            .skippable(true),
        )
        .step(
            Step::new(
                "save",
                "Save Your Changes",
                "Great! You've set up your organization information. Click 'Save' to apply your \
                 changes and complete the setup.",
            )
            .at("btn-save-org", Side::Top)
            .on_target_click(),
        )
        .on_complete(SideEffect::MarkModule {
            module_id: "org-setup".to_string(),
        })
        .build()
}

fn team_invite() -> Result<Tour> {
    Tour::builder("team-invite", "Invite your team")
        .description("Add the first member to your workspace")
        .step(Step::new(
            "intro",
            "Invite Key Users",
            "Welcome! Let's invite your team members. This will help you collaborate on \
             decisions and manage your family office workspace together.",
        ))
        .step(
            Step::new(
                "invite-first",
                "Invite Your First Team Member",
                "Click the 'Invite first user' button to add colleagues to your workspace. Team \
                 members can collaborate on decisions and access shared documents.",
            )
            .at("btn-invite-first", Side::Right)
            .on_target_click()
            .skippable(true),
        )
        .step(
            Step::new(
                "member-details",
                "Enter Team Member Details",
                "Enter the email address and select a role for your team member. They'll \
                 receive an invitation to join your workspace and can start collaborating \
                 immediately.",
            )
            .at("input-email", Side::Bottom)
            .on_action("btn-send-invitation")
            .skippable(true),
        )
        .on_complete(SideEffect::MarkModule {
            module_id: "add-team-member".to_string(),
        })
        .build()
}

fn category_setup() -> Result<Tour> {
    const CONTINUE: &str = "category-wizard-continue-btn";

    Tour::builder("category-setup", "Create a category")
        .description("Walk through the category wizard")
        .step(
            Step::new(
                "new-category",
                "Create New Category",
                "Welcome! Let's create your first category. Categories help you organize \
                 decisions and quickly find important information. Click 'New category' to get \
                 started.",
            )
            .at("btn-new-category", Side::Right)
            .on_target_click(),
        )
        .step(
            Step::new(
                "details",
                "Enter Category Details",
                "Enter a name and select the appropriate category type. You can also choose an \
                 icon for your category to make it easier to identify.",
            )
            .at("category-wizard-name-input", Side::Bottom)
            .on_action(CONTINUE)
            .skippable(true)
            .with_skip_gate(FieldPredicate::all_filled([
                "category-wizard-name-input",
                "category-wizard-type-select",
            ])),
        )
        .step(
            Step::new(
                "capsules",
                "Select Category Capsules",
                "Choose the information users must provide when creating new items in this \
                 category. For example, track amounts & budgets, upload attachments, or link \
                 related items.",
            )
            .at("category-wizard-capsules", Side::Bottom)
            .on_action(CONTINUE)
            .skippable(true),
        )
        .step(
            Step::new(
                "custom-fields",
                "Set Up Custom Fields (Optional)",
                "Add custom fields to capture more context for items in this category. You can \
                 create multiple custom sections, add relevant fields to each one, and organize \
                 information in a clear hierarchy.",
            )
            .at("category-wizard-custom-fields", Side::Bottom)
            .on_action(CONTINUE)
            .skippable(true),
        )
        .step(
            Step::new(
                "workflow",
                "Workflow Configuration",
                "Configure the approval workflow for items in this category. You can use the \
                 default workflow, select an existing one, set up ad hoc approval, or create a \
                 new workflow.",
            )
            .at("category-wizard-workflow", Side::Bottom)
            .on_action("category-wizard-create-btn"),
        )
        .on_complete(SideEffect::MarkModule {
            module_id: "setup-domains".to_string(),
        })
        .build()
}

fn product_tutorial() -> Result<Tour> {
    let stop = |id: &str, title: &str, body: &str, target: &str, side: Side| {
        Step::new(id, title, body).at(target, side)
    };

    Tour::builder("product-tutorial", "Product tour")
        .description("A two-minute look around the dashboard")
        .step(Step::new(
            "welcome",
            "Welcome to Way2B1",
            "Let's take a quick tour to help you get the most out of Way2B1. This will only \
             take 2 minutes!",
        ))
        .step(stop(
            "dashboard",
            "Your Dashboard",
            "This is your command center. See all your pending decisions, active tasks, and \
             important metrics at a glance.",
            "stats-grid",
            Side::Bottom,
        ))
        .step(stop(
            "decisions",
            "Recent Decisions",
            "Track all your business decisions here. See what needs your attention and what has \
             been approved.",
            "recent-decisions",
            Side::Top,
        ))
        .step(stop(
            "tasks",
            "Task Management",
            "Stay on top of your tasks with due dates and priorities. Check them off as you \
             complete them.",
            "upcoming-tasks",
            Side::Top,
        ))
        .step(stop(
            "search",
            "Quick Search",
            "Use the search bar or press ⌘K to quickly find anything in your workspace.",
            "search-bar",
            Side::Bottom,
        ))
        .step(stop(
            "create",
            "Create New Items",
            "Click here to quickly create new decisions, tasks, or projects.",
            "create-button",
            Side::Bottom,
        ))
        .step(stop(
            "navigation",
            "Navigation",
            "Access all your tools from the sidebar. Switch between Decisions, Tasks, Domains, \
             and more.",
            "navigation",
            Side::Right,
        ))
        .step(Step::new(
            "done",
            "You're All Set!",
            "Explore the interactive hotspots to learn more about specific features. Press ⌘K \
             anytime to search!",
        ))
        .build()
}

fn user_homepage() -> Result<Tour> {
    Tour::builder("user-homepage", "Your homepage")
        .description("Search, profile and where your work lives")
        .step(
            Step::new(
                "search",
                "Quick search",
                "Find anything in the system from here. Press ⌘K to open search from anywhere.",
            )
            .at("user-search-input", Side::Bottom),
        )
        .step(
            Step::new(
                "profile",
                "Your profile",
                "Manage your profile and settings here. The Support and Feedback buttons live \
                 here too, if you have questions or problems.",
            )
            .at("user-profile-avatar", Side::Bottom),
        )
        .step(
            Step::new(
                "environment",
                "Environment switch",
                "This button switches between environments.",
            )
            .at("user-current-gen-switch", Side::Bottom),
        )
        .step(
            Step::new(
                "workspace",
                "Your workspace",
                "All tasks and decisions assigned to you are here. Open Tasks or Decisions to \
                 get started.",
            )
            .at("sidebar-tasks-link", Side::Right),
        )
        .abort_completes(true)
        .build()
}
