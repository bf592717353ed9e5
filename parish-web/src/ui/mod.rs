use std::rc::Rc;

mod app;
pub use app::{App, AppProps};

mod comment_item;
pub use comment_item::CommentItem;

mod like_button;
pub use like_button::LikeButton;

mod share_menu;
pub use share_menu::ShareMenu;

mod toasts;
pub use toasts::Toasts;

/// Handle passed down as a property, equal only to itself
pub struct Shared<T>(pub Rc<T>);

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Shared(self.0.clone())
    }
}

impl<T> PartialEq for Shared<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
