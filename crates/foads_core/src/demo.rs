//! Static fallback catalogs used when the backend is unreachable.
//!
//! Anything built from these functions is returned with `is_demo = true`
//! and is never written to the asset store.

use crate::{Avatar, AvatarList, GpuStatus, ResponseStatus, StyleList, Voice, VoiceList};

/// Placeholder presenters.
pub fn avatars() -> AvatarList {
    let avatar = |id: &str, name: &str, img: &str| Avatar {
        id: id.to_string(),
        name: name.to_string(),
        img: img.to_string(),
    };

    AvatarList {
        status: ResponseStatus::Success,
        avatars: vec![
            avatar(
                "demo_avatar_1",
                "Avatar Demo 1",
                "https://images.unsplash.com/photo-1534528741775-53994a69daeb?w=400&h=400&fit=crop",
            ),
            avatar(
                "demo_avatar_2",
                "Avatar Demo 2",
                "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=400&h=400&fit=crop",
            ),
            avatar(
                "demo_avatar_3",
                "Avatar Demo 3",
                "https://images.unsplash.com/photo-1438761681033-6461ffad8d80?w=400&h=400&fit=crop",
            ),
        ],
    }
}

/// Spanish and English neural voices.
pub fn voices() -> VoiceList {
    let voice = |id: &str, name: &str, language: &str, gender: &str| Voice {
        id: id.to_string(),
        name: name.to_string(),
        language: language.to_string(),
        gender: gender.to_string(),
        country: None,
    };

    VoiceList {
        status: ResponseStatus::Success,
        voices: vec![
            voice("es-MX-DaliaNeural", "Dalia (Español MX)", "es-MX", "Female"),
            voice("es-MX-JorgeNeural", "Jorge (Español MX)", "es-MX", "Male"),
            voice("es-ES-ElviraNeural", "Elvira (Español ES)", "es-ES", "Female"),
            voice("es-ES-AlvaroNeural", "Álvaro (Español ES)", "es-ES", "Male"),
            voice("en-US-JennyNeural", "Jenny (English US)", "en-US", "Female"),
            voice("en-US-GuyNeural", "Guy (English US)", "en-US", "Male"),
        ],
    }
}

/// Style presets known to ship with the backend.
pub fn styles() -> StyleList {
    StyleList {
        status: ResponseStatus::Success,
        styles: [
            "Fooocus V2",
            "Fooocus Cinematic",
            "Fooocus Photograph",
            "SAI Anime",
            "SAI 3D Model",
            "MRE Cinematic Dynamic",
            "None",
        ]
        .into_iter()
        .map(String::from)
        .collect(),
    }
}

/// GPU status shown while offline.
pub fn gpu_status() -> GpuStatus {
    GpuStatus::offline()
}
