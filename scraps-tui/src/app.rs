use std::sync::Arc;

use scraps_core::{
    model::Category,
    ports::{Animation, AnimationMeta},
    service::ScrapsService,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Page {
    Home,
    LogWaste,
    Analytics,
    Tips,
    Donations,
}

impl Page {
    pub(crate) const ALL: [Self; 5] = [
        Self::Home,
        Self::LogWaste,
        Self::Analytics,
        Self::Tips,
        Self::Donations,
    ];

    pub(crate) const fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::LogWaste => "Log Waste",
            Self::Analytics => "Waste Analytics",
            Self::Tips => "Waste Reduction Tips",
            Self::Donations => "Donation Network",
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    pub(crate) fn next(self) -> Self {
        Self::ALL
            .get((self.index() + 1) % Self::ALL.len())
            .copied()
            .unwrap_or(Self::Home)
    }

    pub(crate) fn previous(self) -> Self {
        Self::ALL
            .get((self.index() + Self::ALL.len() - 1) % Self::ALL.len())
            .copied()
            .unwrap_or(Self::Home)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Focus {
    Menu,
    Form,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Field {
    FoodItem,
    Category,
    Amount,
}

impl Field {
    pub(crate) fn next(self) -> Self {
        match self {
            Self::FoodItem => Self::Category,
            Self::Category => Self::Amount,
            Self::Amount => Self::FoodItem,
        }
    }

    pub(crate) fn previous(self) -> Self {
        match self {
            Self::FoodItem => Self::Amount,
            Self::Category => Self::FoodItem,
            Self::Amount => Self::Category,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct LogForm {
    pub food_item: String,
    pub category_index: usize,
    pub amount: String,
    pub field: Field,
}

impl LogForm {
    pub(crate) fn new() -> Self {
        Self {
            food_item: String::new(),
            category_index: 0,
            amount: String::new(),
            field: Field::FoodItem,
        }
    }

    pub(crate) fn category(&self) -> Category {
        Category::ALL
            .get(self.category_index)
            .copied()
            .unwrap_or(Category::Other)
    }

    pub(crate) fn cycle_category(&mut self, forward: bool) {
        let count = Category::ALL.len();
        self.category_index = if forward {
            (self.category_index + 1) % count
        } else {
            (self.category_index + count - 1) % count
        };
    }

    /// The amount as typed; empty or unparsable input reads as zero.
    pub(crate) fn amount_grams(&self) -> i64 {
        self.amount.trim().parse().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Status {
    Success(String),
    Error(String),
}

pub(crate) struct App {
    pub service: Arc<ScrapsService>,

    pub page: Page,
    pub focus: Focus,
    pub form: LogForm,

    pub status: Option<Status>,
    pub animation: Option<AnimationMeta>,
    pub storage_label: String,
}

impl App {
    pub(crate) fn new(service: Arc<ScrapsService>, storage_label: String) -> Self {
        Self {
            service,
            page: Page::Home,
            focus: Focus::Menu,
            form: LogForm::new(),
            status: None,
            animation: None,
            storage_label,
        }
    }

    pub(crate) fn select_page(&mut self, page: Page) {
        self.page = page;
        self.focus = Focus::Menu;
    }

    pub(crate) fn enter_page(&mut self) {
        if self.page == Page::LogWaste {
            self.focus = Focus::Form;
        }
    }

    pub(crate) fn submit_entry(&mut self) {
        let food_item = self.form.food_item.trim().to_owned();
        let category = self.form.category();
        let amount = self.form.amount_grams();

        // zero-gram entries are refused here; the ledger itself would accept them
        if food_item.is_empty() || amount <= 0 {
            self.status = Some(Status::Error("Please enter valid information.".to_owned()));
            return;
        }

        match self.service.log_waste(&food_item, category.label(), amount) {
            Ok(id) => {
                tracing::info!(%id, %category, amount, "logged waste");
                self.status = Some(Status::Success(format!(
                    "Logged {amount}g of {food_item} in the {category} category."
                )));
                self.form = LogForm::new();
            }
            Err(err) => {
                tracing::warn!(%err, "could not log waste");
                self.status = Some(Status::Error(format!("Could not log entry: {err}")));
            }
        }
    }

    pub(crate) fn set_animation(&mut self, animation: Option<Animation>) {
        self.animation = animation.map(|animation| animation.meta);
    }
}
